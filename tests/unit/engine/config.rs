use super::*;

#[test]
fn defaults_match_reference_budget() {
    let cfg = ApproxConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.search.max_trials(), 155);
    assert_eq!(cfg.converge.spawns_per_tick, 3);
    assert_eq!(cfg.background, 255);
    assert_eq!(cfg.playback_fps, Fps::new(12, 1).unwrap());
}

#[test]
fn partial_json_fills_defaults() {
    let json = r#"{ "converge": { "max_sprites": 500 }, "seed": 7 }"#;
    let cfg: ApproxConfig = serde_json::from_str(json).unwrap();
    assert_eq!(cfg.converge.max_sprites, 500);
    assert_eq!(cfg.converge.diff_target, 0.02);
    assert_eq!(cfg.seed, Some(7));
    assert_eq!(cfg.search, SearchConfig::default());
    assert_eq!(cfg.candidate.child_traits, ChildTraits::Reroll);
}

#[test]
fn child_traits_parse_snake_case() {
    let json = r#"{ "candidate": { "child_traits": "inherit" } }"#;
    let cfg: ApproxConfig = serde_json::from_str(json).unwrap();
    assert_eq!(cfg.candidate.child_traits, ChildTraits::Inherit);
}

#[test]
fn validate_rejects_bad_values() {
    let mut cfg = ApproxConfig::default();
    cfg.converge.max_sprites = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = ApproxConfig::default();
    cfg.fitness.sample_stride = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = ApproxConfig::default();
    cfg.candidate.child_scale_min = 2.0;
    assert!(cfg.validate().is_err());

    let mut cfg = ApproxConfig::default();
    cfg.candidate.scale_exp_min = -3.0;
    assert!(cfg.validate().is_err());

    let mut cfg = ApproxConfig::default();
    cfg.converge.diff_target = f64::NAN;
    assert!(cfg.validate().is_err());
}

#[test]
fn load_json_reports_parse_errors() {
    let dir = std::env::temp_dir().join("appletrace_config_test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = ApproxConfig::load_json(&path).unwrap_err();
    assert!(err.to_string().contains("serialization error:"));
}
