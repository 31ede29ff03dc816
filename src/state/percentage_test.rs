use super::*;

#[test]
fn initial_mode_from_attribute() {
    let el = ElementData::new().with_data(INITIAL_PERCENTAGE_ATTR, "true");
    assert!(PercentageToggle::from_element(&el).is_percentage);

    for other in ["false", "TRUE", "1", ""] {
        let el = ElementData::new().with_data(INITIAL_PERCENTAGE_ATTR, other);
        assert!(!PercentageToggle::from_element(&el).is_percentage, "{other:?}");
    }
    assert!(!PercentageToggle::from_element(&ElementData::new()).is_percentage);
}

#[test]
fn setters_force_mode() {
    let mut t = PercentageToggle::default();
    t.set_percentage();
    t.set_percentage();
    assert!(t.is_percentage);
    t.set_fixed();
    assert!(!t.is_percentage);
}
