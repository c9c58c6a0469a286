// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Print the DummySite CustomResourceDefinition as YAML.

use dummysite_operator::types::DummySite;
use kube::CustomResourceExt;

fn main() -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(&DummySite::crd())?);
    Ok(())
}
