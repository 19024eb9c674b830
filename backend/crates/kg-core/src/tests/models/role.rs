use crate::Role;

use std::str::FromStr;

#[test]
fn test_role_round_trips_through_str() {
    for role in [Role::Admin, Role::Staff, Role::Customer] {
        assert_eq!(Role::from_str(role.as_str()).unwrap(), role);
    }
    assert!(Role::from_str("owner").is_err());
}

#[test]
fn test_role_default_is_customer() {
    assert_eq!(Role::default(), Role::Customer);
}
