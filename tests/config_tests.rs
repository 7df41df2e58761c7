use std::path::PathBuf;

use hero_letterbox::config::{self, Configuration, Job};
use hero_letterbox::{ConfigError, LetterboxSettings};

#[test]
fn defaults_match_hero_canvas() {
    let cfg: Configuration = serde_yaml::from_str("jobs: []").unwrap();
    assert_eq!(cfg.canvas, LetterboxSettings::default());
    assert_eq!((cfg.canvas.width, cfg.canvas.height), (1440, 720));
    assert_eq!(cfg.canvas.background, [0, 0, 0]);
    assert_eq!(cfg.canvas.quality, 95);
}

#[test]
fn parse_kebab_case_config() {
    let yaml = r#"
width: 1920
height: 1080
background: [16, 16, 16]
quality: 85
jobs:
  - source: docs/image/2.jpg
    destination: docs/image/hero_2.jpg
  - source: docs/image/1.jpg
    destination: docs/image/hero_1.jpg
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    cfg.validate().unwrap();
    assert_eq!(cfg.canvas.width, 1920);
    assert_eq!(cfg.canvas.height, 1080);
    assert_eq!(cfg.canvas.background, [16, 16, 16]);
    assert_eq!(cfg.canvas.quality, 85);
    assert_eq!(cfg.jobs.len(), 2);
    assert_eq!(cfg.jobs[0].source, PathBuf::from("docs/image/2.jpg"));
    assert_eq!(cfg.jobs[1].destination, PathBuf::from("docs/image/hero_1.jpg"));
}

#[test]
fn zero_canvas_is_rejected() {
    let cfg: Configuration = serde_yaml::from_str("height: 0").unwrap();
    assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn canvas_too_large_to_allocate_is_rejected() {
    let cfg: Configuration = serde_yaml::from_str("width: 4294967295\nheight: 4294967295").unwrap();
    assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

    let cfg: Configuration = serde_yaml::from_str("width: 100000\nheight: 100000").unwrap();
    assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn quality_out_of_range_is_rejected() {
    let cfg: Configuration = serde_yaml::from_str("quality: 101").unwrap();
    assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn job_missing_destination_fails_to_parse() {
    let yaml = r#"
jobs:
  - source: a.jpg
"#;
    assert!(serde_yaml::from_str::<Configuration>(yaml).is_err());
}

#[test]
fn from_yaml_file_reports_missing_file() {
    let tmp = tempfile::tempdir().unwrap();
    let err = config::from_yaml_file(&tmp.path().join("nope.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn sample_config_parses() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("hero-letterbox.yaml");
    let cfg = config::from_yaml_file(&path).unwrap();
    cfg.validate().unwrap();
    assert_eq!(
        cfg.jobs,
        vec![
            Job::new("docs/image/2.jpg", "docs/image/hero_2.jpg"),
            Job::new("docs/image/3.jpg", "docs/image/hero_3.jpg"),
            Job::new("docs/image/1.jpg", "docs/image/hero_1.jpg"),
        ]
    );
}
