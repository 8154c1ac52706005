#![cfg(feature = "serde")]

use gtpsa::{DescError, DescriptorConfig};

#[test]
fn roundtrip_config_json() {
    let cfg = DescriptorConfig::new(6, 4).truncation(3).max_tmp(12).threads(2);
    let json = serde_json::to_string(&cfg).unwrap();
    let back: DescriptorConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cfg);

    let d = back.build().unwrap();
    assert_eq!((d.nv(), d.mo(), d.to()), (6, 4, 3));
    assert_eq!(d.max_tmp(), 12);
}

#[test]
fn missing_fields_take_defaults() {
    let cfg: DescriptorConfig = serde_json::from_str(r#"{ "nv": 4, "mo": 2 }"#).unwrap();
    assert_eq!(cfg.to, None);
    assert_eq!(cfg.max_tmp, gtpsa::DESC_MAX_TMP);
    assert_eq!(cfg.threads, 1);
}

#[test]
fn invalid_config_is_rejected_at_build() {
    let cfg: DescriptorConfig =
        serde_json::from_str(r#"{ "nv": 2, "mo": 3, "to": 5 }"#).unwrap();
    assert_eq!(
        cfg.build().unwrap_err(),
        DescError::TruncationAboveMax { to: 5, mo: 3 }
    );
}
