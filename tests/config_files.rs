//! Loading configuration files from disk, including older layouts.

use std::path::Path;

use rs_knob::config::{
    self, ActionObject, ConfigOrigin, Configuration, FileSource, GestureSlot, SchemaShape,
};

fn write(dir: &Path, text: &str) -> FileSource {
    let path = dir.join("profiles.json");
    std::fs::write(&path, text).unwrap();
    FileSource::new(path)
}

#[test]
fn no_file_boots_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = config::load_detailed(&mut FileSource::new(dir.path().join("profiles.json")));

    assert!(matches!(loaded.origin, ConfigOrigin::Default(_)));
    assert_eq!(loaded.config, Configuration::default());
    assert_eq!(loaded.config.current_profile, 1);
}

#[test]
fn bare_name_file_is_upgraded() {
    let dir = tempfile::tempdir().unwrap();
    let mut source = write(
        dir.path(),
        r#"{
            "current_profile": 2,
            "sensitivity_volume": 4,
            "sensitivity_scroll": 3,
            "profiles": [
                {"cw": "volume_up", "ccw": "volume_down", "click": "mute", "long_press": "next_profile"},
                {"cw": "scroll_up", "ccw": "scroll_down", "click": "play_pause", "long_press": "next_profile"},
                {"cw": "next_track", "ccw": "prev_track", "click": "nothing", "long_press": "next_profile"}
            ]
        }"#,
    );

    let loaded = config::load_detailed(&mut source);

    assert_eq!(loaded.origin, ConfigOrigin::Migrated(SchemaShape::BareNames));
    let cfg = loaded.config;
    assert_eq!(cfg.profiles[0].cw, ActionObject::simple("volume_up"));
    assert_eq!(cfg.profiles[0].cw_shifted, ActionObject::nothing());
    assert_eq!(cfg.profiles[2].ccw, ActionObject::simple("prev_track"));
    assert_eq!(cfg.current_profile, 2);
    assert_eq!(cfg.sensitivity_volume, 4);
    assert_eq!(cfg.sensitivity_mouse, 4);
}

#[test]
fn four_slot_object_file_gains_shifted_slots() {
    let dir = tempfile::tempdir().unwrap();
    let simple = |a: &str| format!(r#"{{"type": "simple", "action": "{a}"}}"#);
    let profile = format!(
        r#"{{"cw": {}, "ccw": {}, "click": {{"type": "macro", "keys": ["CTRL", "C"]}}, "long_press": {}}}"#,
        simple("volume_up"),
        simple("volume_down"),
        simple("next_profile"),
    );
    let text = format!(
        r#"{{"current_profile": 1, "sensitivity_volume": 2, "sensitivity_scroll": 1,
            "sensitivity_mouse": 5, "profiles": [{profile}, {profile}, {profile}]}}"#
    );
    let mut source = write(dir.path(), &text);

    let loaded = config::load_detailed(&mut source);

    assert_eq!(loaded.origin, ConfigOrigin::Migrated(SchemaShape::MissingShifted));
    let p = &loaded.config.profiles[1];
    assert_eq!(p.click, ActionObject::keys(&["CTRL", "C"]));
    assert_eq!(p.slot(GestureSlot::CcwShifted), &ActionObject::nothing());
    assert_eq!(loaded.config.sensitivity_mouse, 5);
}

#[test]
fn current_file_loads_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let written = Configuration::default()
        .with_current_profile(3)
        .with_sensitivity_mouse(9)
        .with_binding(2, GestureSlot::CwShifted, ActionObject::keys(&["ALT", "TAB"]));
    let mut source = write(dir.path(), &written.to_json_pretty().unwrap());

    let loaded = config::load_detailed(&mut source);

    assert_eq!(loaded.origin, ConfigOrigin::Current);
    assert_eq!(loaded.config, written);
}

#[test]
fn out_of_range_values_are_reset() {
    let dir = tempfile::tempdir().unwrap();
    let mut value: serde_json::Value =
        serde_json::from_str(&Configuration::default().to_json_pretty().unwrap()).unwrap();
    value["current_profile"] = 7.into();
    value["sensitivity_volume"] = 42.into();
    value["sensitivity_scroll"] = 0.into();
    let mut source = write(dir.path(), &value.to_string());

    let cfg = config::load(&mut source);

    assert_eq!(cfg.current_profile, 1);
    assert_eq!(cfg.sensitivity_volume, 2);
    assert_eq!(cfg.sensitivity_scroll, 1);
}

#[test]
fn file_missing_a_setting_keeps_its_bindings() {
    let dir = tempfile::tempdir().unwrap();
    let mut value: serde_json::Value =
        serde_json::from_str(&Configuration::default().to_json_pretty().unwrap()).unwrap();
    value.as_object_mut().unwrap().remove("sensitivity_mouse");
    value["profiles"][0]["cw"] = serde_json::json!({"type": "simple", "action": "mute"});
    let mut source = write(dir.path(), &value.to_string());

    let loaded = config::load_detailed(&mut source);

    assert_eq!(loaded.origin, ConfigOrigin::Migrated(SchemaShape::MissingSettings));
    assert_eq!(loaded.config.profiles[0].cw, ActionObject::simple("mute"));
    assert_eq!(loaded.config.sensitivity_mouse, 4);
}

#[test]
fn broken_files_fall_back_to_defaults() {
    let cases = [
        "",
        "{",
        "[]",
        r#"{"profiles": "nope"}"#,
        r#"{"current_profile": 1, "profiles": [{"cw": 5}]}"#,
    ];
    for text in cases {
        let dir = tempfile::tempdir().unwrap();
        let loaded = config::load_detailed(&mut write(dir.path(), text));
        assert!(
            matches!(loaded.origin, ConfigOrigin::Default(_)),
            "{text:?} gave {:?}",
            loaded.origin
        );
        assert_eq!(loaded.config, Configuration::default());
    }
}
