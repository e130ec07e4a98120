use component_macros::{component_methods, Injectable};
use infrastructure_common::{arguments, Component, Injectable};

#[derive(Injectable)]
struct Greeter;

#[component_methods]
impl Greeter {
    pub fn greet(&self, name: &str, #[default("!".to_string())] suffix: String) -> String {
        format!("hello {}{}", name, suffix)
    }

    pub fn count(&self, items: Vec<u32>) -> Option<usize> {
        (!items.is_empty()).then(|| items.len())
    }

    #[sealed]
    pub fn reset(&self) {}

    pub fn create() -> Self {
        Greeter
    }

    fn private_helper(&self) -> u32 {
        1
    }
}

fn main() {
    let greeter = Greeter::create();
    let greeting = greeter.invoke("greet", &mut arguments!["rust".to_string()]).unwrap();
    assert_eq!(greeting.and_then(|v| v.get::<String>()).as_deref(), Some("hello rust!"));
    assert_eq!(greeter.private_helper(), 1);
    assert_eq!(Greeter::methods().len(), 4);
}
