//! Bounded one-dimensional maximisation (golden-section search) used by the
//! envelope builder for rate shapes with no closed-form bound.

const GOLDEN: f64 = 0.618_033_988_749_895;

/// Golden-section search for the maximiser of `f` on `[a, b]`, seeded with both
/// endpoints and one interior sample as the design calls for. Returns the
/// location of the (approximate) maximiser; the caller is responsible for also
/// evaluating `f` at `a` and `b` and taking the overall maximum, since golden
/// section search can miss a maximum sitting exactly on a boundary.
pub fn golden_section_argmax(f: impl Fn(f64) -> f64, a: f64, b: f64, iters: usize) -> f64 {
    if !(b > a) {
        return a;
    }

    let mut lo = a;
    let mut hi = b;
    let mut x1 = hi - GOLDEN * (hi - lo);
    let mut x2 = lo + GOLDEN * (hi - lo);
    let mut f1 = f(x1);
    let mut f2 = f(x2);

    for _ in 0..iters {
        if hi - lo < 1e-12 {
            break;
        }
        if f1 < f2 {
            lo = x1;
            x1 = x2;
            f1 = f2;
            x2 = lo + GOLDEN * (hi - lo);
            f2 = f(x2);
        } else {
            hi = x2;
            x2 = x1;
            f2 = f1;
            x1 = hi - GOLDEN * (hi - lo);
            f1 = f(x1);
        }
    }

    if f1 > f2 {
        x1
    } else {
        x2
    }
}

/// Runs the maximiser, then evaluates `f` at the maximiser and both endpoints and
/// returns the largest value observed, per the envelope-builder algorithm.
pub fn bracketed_sup(f: impl Fn(f64) -> f64, a: f64, b: f64, iters: usize) -> f64 {
    let x_star = golden_section_argmax(&f, a, b, iters);
    f(a).max(f(b)).max(f(x_star))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_interior_maximum_of_parabola() {
        // f(t) = 1 - (t - 3)^2, max at t = 3, value 1
        let sup = bracketed_sup(|t| 1.0 - (t - 3.0).powi(2), 0.0, 10.0, 100);
        assert!((sup - 1.0).abs() < 1e-6);
    }

    #[test]
    fn finds_boundary_maximum_of_monotone_function() {
        let sup = bracketed_sup(|t| t, 0.0, 5.0, 100);
        assert!((sup - 5.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_interval_returns_left_endpoint() {
        let x = golden_section_argmax(|t| t, 2.0, 2.0, 50);
        assert_eq!(x, 2.0);
    }
}
