use component_macros::{component_methods, Injectable};
use infrastructure_common::{Injectable, Instance, Visibility};
use std::sync::Arc;

#[derive(Injectable)]
#[injectable(name = "shop::Clock")]
struct Clock;

#[component_methods]
impl Clock {}

#[derive(Injectable)]
#[injectable(extends = "shop::Service", implements = "shop::Checkout, shop::Audited", sealed)]
struct Checkout {
    #[inject]
    clock: Arc<Clock>,
    #[inject("shop::Repository")]
    repository: Instance,
    retries: u32,
}

#[component_methods]
impl Checkout {}

#[derive(Injectable)]
#[injectable(constructor = "protected")]
struct Hidden;

#[component_methods]
impl Hidden {}

fn main() {
    let descriptor = Checkout::descriptor();
    assert_eq!(descriptor.name.as_str(), "Checkout");
    assert!(descriptor.is_final());
    assert_eq!(descriptor.parent.as_ref().map(|p| p.as_str()), Some("shop::Service"));
    assert_eq!(descriptor.interfaces.len(), 2);

    let signature = descriptor.constructor.as_ref().unwrap().signature();
    assert_eq!(signature[0].0, "clock");
    assert_eq!(signature[0].1.as_ref().map(|t| t.as_str()), Some("shop::Clock"));
    assert_eq!(signature[1].1.as_ref().map(|t| t.as_str()), Some("shop::Repository"));

    let hidden = Hidden::descriptor();
    assert_eq!(hidden.constructor.unwrap().visibility, Visibility::Protected);
    assert!(Clock::descriptor().constructor.is_none());
}
