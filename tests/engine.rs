use chroma_affect::{AchromaticThresholds, AffectEngine, EngineParams, Hsv, HueBin, Lab, Rgb};

fn rgb(r: f64, g: f64, b: f64) -> Rgb {
    Rgb::new(r, g, b).unwrap()
}

#[test]
fn probabilities_sum_to_one_across_color_grid() {
    let engine = AffectEngine::new().unwrap();
    for r in 0..=4 {
        for g in 0..=4 {
            for b in 0..=4 {
                let color = rgb(r as f64 / 4.0, g as f64 / 4.0, b as f64 / 4.0);
                let result = engine.evaluate(color);
                let total: f64 = result.probs.values().sum();
                assert!(
                    (total - 1.0).abs() < 1e-6,
                    "sum = {} for {:?}",
                    total,
                    color
                );
            }
        }
    }
}

#[test]
fn every_saturated_hue_resolves_to_exactly_one_chromatic_bin() {
    let thresholds = AchromaticThresholds::default();
    let mut hue = 0.0;
    while hue < 360.0 {
        let hsv = Hsv {
            h: hue,
            s: 0.5,
            v: 0.5,
        };
        let bin = HueBin::classify(hsv, 60.0, &thresholds);
        assert!(
            !matches!(bin, HueBin::GrayBlack | HueBin::White),
            "saturated hue {} routed achromatic",
            hue
        );
        hue += 0.25;
    }
}

#[test]
fn hue_bin_boundaries_are_half_open() {
    let thresholds = AchromaticThresholds::default();
    let classify = |h: f64| {
        HueBin::classify(
            Hsv {
                h,
                s: 0.9,
                v: 0.9,
            },
            60.0,
            &thresholds,
        )
    };
    assert_eq!(classify(0.0), HueBin::Red);
    assert_eq!(classify(15.0), HueBin::Orange);
    assert_eq!(classify(14.999), HueBin::Red);
    assert_eq!(classify(325.0), HueBin::Red);
    assert_eq!(classify(324.999), HueBin::Magenta);
}

#[test]
fn vivid_red_anger_probability_meets_floor() {
    let engine = AffectEngine::new().unwrap();
    // A saturated red whose L* lands in [45, 70].
    let color = rgb(0.86, 0.08, 0.08);
    let hsv = Hsv::from_srgb(color);
    let lab = Lab::from_srgb(color);
    assert!(hsv.s >= 0.6, "fixture must be vivid, s = {}", hsv.s);
    assert!(
        (45.0..=70.0).contains(&lab.l),
        "fixture L* = {} outside gate",
        lab.l
    );

    let result = engine.evaluate(color);
    let anger = result.probs["anger"];
    let mean_ref = 0.5 * (result.probs["love"] + result.probs["amusement"]);
    assert!(anger >= 0.90 * mean_ref - 1e-9);
}

#[test]
fn dark_achromatic_outweighs_mid_achromatic_on_negative_mass() {
    let engine = AffectEngine::new().unwrap();
    let negative_mass = |color: Rgb| -> f64 {
        let result = engine.evaluate(color);
        ["sad", "tired", "anxious", "anger"]
            .iter()
            .map(|name| result.probs[name])
            .sum()
    };

    let dark = rgb(0.18, 0.18, 0.18); // L* ≈ 19
    let mid = rgb(0.55, 0.55, 0.55); // L* ≈ 60
    assert!(Lab::from_srgb(dark).l < 35.0);
    assert!(negative_mass(dark) > negative_mass(mid));
}

#[test]
fn hex_round_trip_stays_within_channel_tolerance() {
    let samples = [
        rgb(0.0, 0.0, 0.0),
        rgb(1.0, 1.0, 1.0),
        rgb(0.123, 0.456, 0.789),
        rgb(0.999, 0.001, 0.5),
    ];
    for original in samples {
        let hex = original.to_hex();
        let round_tripped = Rgb::from_hex(&hex).unwrap();
        let tol = 1.0 / 255.0;
        assert!((original.r() - round_tripped.r()).abs() <= tol, "{}", hex);
        assert!((original.g() - round_tripped.g()).abs() <= tol, "{}", hex);
        assert!((original.b() - round_tripped.b()).abs() <= tol, "{}", hex);
    }
}

#[test]
fn finalized_priors_respect_the_diversity_cap() {
    let engine = AffectEngine::new().unwrap();
    let registry = engine.registry();
    for (bin, row) in registry.prior_rows() {
        for (name, weight) in row {
            assert!(
                *weight <= registry.diversity_cap() + 1e-9,
                "{}/{} = {}",
                bin.name(),
                name,
                weight
            );
        }
    }
}

#[test]
fn top_five_ordering_is_reproducible() {
    let color = rgb(0.42, 0.67, 0.31);
    let first = AffectEngine::new().unwrap().evaluate(color);
    let second = AffectEngine::new().unwrap().evaluate(color);
    assert_eq!(first.top, second.top);
    assert_eq!(first.top.len(), 5);
}

#[test]
fn configured_engine_still_satisfies_sum_invariant() {
    let params = EngineParams::from_toml_str(
        "[engine]\ndiversity_cap = 0.40\nentropy_floor = 0.01\ntop_k = 7\n",
    )
    .unwrap();
    let engine = AffectEngine::with_params(params).unwrap();
    let result = engine.evaluate(rgb(0.6, 0.2, 0.8));
    let total: f64 = result.probs.values().sum();
    assert!((total - 1.0).abs() < 1e-6);
    assert_eq!(result.top.len(), 7);
}

#[test]
fn invalid_input_is_rejected_not_coerced() {
    assert!(Rgb::new(1.1, 0.0, 0.0).is_err());
    assert!(Rgb::from_hex("#XYZXYZ").is_err());
    let engine = AffectEngine::new().unwrap();
    assert!(engine.evaluate_hex("12345").is_err());
}
