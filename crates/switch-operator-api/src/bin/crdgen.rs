//! Print the custom resource definitions as a multi-document YAML stream.

use kube::CustomResourceExt;
use switch_operator_api::{Switch, SwitchInterface};

fn main() -> Result<(), serde_yaml::Error> {
    print!("{}", serde_yaml::to_string(&Switch::crd())?);
    println!("---");
    print!("{}", serde_yaml::to_string(&SwitchInterface::crd())?);
    Ok(())
}
