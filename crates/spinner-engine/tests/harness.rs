//! Sanity checks for the test harness itself.

#[test]
fn canary() {
    assert_eq!(1, 1, "canary could not fail");
}

#[test]
#[ignore = "disabled: demonstrates an ignored failing test"]
fn disabled_feature_2() {
    assert_eq!(1, 2);
}

#[test]
#[ignore = "disabled: demonstrates an ignored failing test"]
fn disabled_feature_3() {
    assert_eq!(1, 2);
}
