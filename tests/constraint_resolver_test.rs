use ratemarkup::engine::{resolve_ceiling, resolve_floor, PriceWindow};
use ratemarkup::{Bound, Combinator, Decimal};

fn d(s: &str) -> Decimal {
    Decimal::from_str_canonical(s).unwrap()
}

fn bound(abs: &str, pct: &str, combinator: Combinator) -> Bound {
    Bound::new(Some(d(abs)), Some(d(pct)), combinator)
}

#[test]
fn test_floor_and_semantics() {
    assert_eq!(
        resolve_floor(d("1000"), &bound("50", "10", Combinator::And)),
        Some(d("1100"))
    );
}

#[test]
fn test_floor_or_semantics() {
    assert_eq!(
        resolve_floor(d("1000"), &bound("50", "20", Combinator::Or)),
        Some(d("1050"))
    );
}

#[test]
fn test_ceiling_and_semantics() {
    assert_eq!(
        resolve_ceiling(d("1000"), &bound("500", "40", Combinator::And)),
        Some(d("1400"))
    );
}

#[test]
fn test_ceiling_or_semantics() {
    assert_eq!(
        resolve_ceiling(d("1000"), &bound("500", "40", Combinator::Or)),
        Some(d("1500"))
    );
}

#[test]
fn test_window_clamp_idempotent_across_combinators() {
    let base = d("1000");
    for min_comb in [Combinator::And, Combinator::Or] {
        for max_comb in [Combinator::And, Combinator::Or] {
            let window = PriceWindow::resolve(
                base,
                &bound("50", "20", min_comb),
                &bound("500", "40", max_comb),
            );
            assert!(window.conflict().is_none());
            for raw in ["0", "1049", "1075", "1300", "1450", "2000"] {
                let once = window.clamp(d(raw));
                assert_eq!(window.clamp(once), once, "raw {}", raw);
            }
        }
    }
}

#[test]
fn test_negative_percentage_floor() {
    let min = Bound::new(None, Some(d("-10")), Combinator::Or);
    assert_eq!(resolve_floor(d("2500"), &min), Some(d("2250")));
    assert_eq!(resolve_ceiling(d("2500"), &min), Some(d("2250")));
}
