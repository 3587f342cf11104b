//! AOT/DeAOT model naming

use std::fmt;
use std::path::Path;

use serde::{Serialize, Serializer};

use super::{file_name_lower, VariantPolicy};
use crate::error::{Error, Result};

/// Tracker family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AotFamily {
    Aot,
    DeAot,
}

/// Model size tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AotSize {
    T,
    S,
    B,
    L,
}

/// Encoder backbone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AotBackbone {
    R50,
    SwinB,
}

/// Model name as understood by the AOT builder, e.g. `r50_deaotl`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AotModel {
    pub backbone: AotBackbone,
    pub family: AotFamily,
    pub size: AotSize,
}

impl fmt::Display for AotModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let backbone = match self.backbone {
            AotBackbone::R50 => "r50",
            AotBackbone::SwinB => "swinb",
        };
        let family = match self.family {
            AotFamily::Aot => "aot",
            AotFamily::DeAot => "deaot",
        };
        let size = match self.size {
            AotSize::T => "t",
            AotSize::S => "s",
            AotSize::B => "b",
            AotSize::L => "l",
        };
        write!(f, "{}_{}{}", backbone, family, size)
    }
}

impl Serialize for AotModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Infer the AOT model name from a checkpoint file name.
///
/// The name is lowercased first. A missing size marker defaults to `l`
/// and a missing backbone to `r50` under [`VariantPolicy::Lenient`].
pub fn infer_aot_model(path: &Path, policy: VariantPolicy) -> Result<AotModel> {
    let name = file_name_lower(path);

    // "deaot" also contains "aot", so the size markers below match both
    let family = if name.contains("deaot") {
        AotFamily::DeAot
    } else {
        AotFamily::Aot
    };

    let size = [
        ("aott", AotSize::T),
        ("aots", AotSize::S),
        ("aotb", AotSize::B),
        ("aotl", AotSize::L),
    ]
    .into_iter()
    .find(|(marker, _)| name.contains(marker))
    .map(|(_, size)| size);

    let backbone = if name.contains("r50") {
        Some(AotBackbone::R50)
    } else if name.contains("swin") {
        Some(AotBackbone::SwinB)
    } else {
        None
    };

    let size = fallback(size, AotSize::L, "size", &name, policy)?;
    let backbone = fallback(backbone, AotBackbone::R50, "backbone", &name, policy)?;

    Ok(AotModel {
        backbone,
        family,
        size,
    })
}

fn fallback<T: fmt::Debug>(
    found: Option<T>,
    default: T,
    what: &str,
    name: &str,
    policy: VariantPolicy,
) -> Result<T> {
    match (found, policy) {
        (Some(v), _) => Ok(v),
        (None, VariantPolicy::Lenient) => {
            tracing::warn!(
                "no AOT {} marker in '{}', defaulting to {:?}",
                what,
                name,
                default
            );
            Ok(default)
        }
        (None, VariantPolicy::Strict) => Err(Error::UnrecognizedVariant {
            kind: "AOT",
            name: name.to_string(),
        }),
    }
}
