//! ADC method identifiers
//!
//! A method string such as `cvs-adc2` is parsed into a [`BaseMethod`] and a
//! [`VariantSet`]. The closed set of accepted strings is the base methods,
//! each optionally prefixed with `cvs-`.

use crate::error::AdcError;
use adc_tree::TreePath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// ADC class: particle-particle or ionisation potential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdcClass {
    /// Particle-particle (excitation energies)
    Pp,
    /// Ionisation potential
    Ip,
}

impl AdcClass {
    /// Root node of this class in the parameter tree
    #[inline]
    #[must_use]
    pub fn tree_root(&self) -> &'static str {
        match self {
            Self::Pp => "adc_pp",
            Self::Ip => "adc_ip",
        }
    }
}

/// Base ADC method
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseMethod {
    /// PP-ADC(0)
    Adc0,
    /// PP-ADC(1)
    Adc1,
    /// PP-ADC(2), strict
    Adc2,
    /// PP-ADC(2), extended
    Adc2x,
    /// PP-ADC(3)
    Adc3,
    /// IP-ADC(0)
    IpAdc0,
    /// IP-ADC(2)
    IpAdc2,
    /// IP-ADC(3)
    IpAdc3,
}

impl BaseMethod {
    /// All base methods
    pub const ALL: [Self; 8] = [
        Self::Adc0,
        Self::Adc1,
        Self::Adc2,
        Self::Adc2x,
        Self::Adc3,
        Self::IpAdc0,
        Self::IpAdc2,
        Self::IpAdc3,
    ];

    /// Method name as used in method strings
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Adc0 => "adc0",
            Self::Adc1 => "adc1",
            Self::Adc2 => "adc2",
            Self::Adc2x => "adc2x",
            Self::Adc3 => "adc3",
            Self::IpAdc0 => "ipadc0",
            Self::IpAdc2 => "ipadc2",
            Self::IpAdc3 => "ipadc3",
        }
    }

    /// Perturbation-theory level
    #[must_use]
    pub fn level(&self) -> u8 {
        match self {
            Self::Adc0 | Self::IpAdc0 => 0,
            Self::Adc1 => 1,
            Self::Adc2 | Self::Adc2x | Self::IpAdc2 => 2,
            Self::Adc3 | Self::IpAdc3 => 3,
        }
    }

    /// ADC class of this method
    #[must_use]
    pub fn class(&self) -> AdcClass {
        match self {
            Self::IpAdc0 | Self::IpAdc2 | Self::IpAdc3 => AdcClass::Ip,
            _ => AdcClass::Pp,
        }
    }
}

impl Display for BaseMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BaseMethod {
    type Err = AdcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| AdcError::InvalidMethod(s.to_string()))
    }
}

/// Method variant flag
///
/// Only `cvs` is accepted in method strings; `sf` is implied by spin-flip
/// state requests. `sos` and `ri` exist in the solver's naming scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// Core-valence separation
    Cvs,
    /// Spin flip
    SpinFlip,
    /// Spin-opposite scaling
    Sos,
    /// Resolution of the identity
    Ri,
}

impl Variant {
    /// Short flag name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cvs => "cvs",
            Self::SpinFlip => "sf",
            Self::Sos => "sos",
            Self::Ri => "ri",
        }
    }
}

/// Set of active variants
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantSet(BTreeSet<Variant>);

impl VariantSet {
    /// Empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variant
    pub fn insert(&mut self, variant: Variant) {
        self.0.insert(variant);
    }

    /// Check for a variant
    #[inline]
    #[must_use]
    pub fn contains(&self, variant: Variant) -> bool {
        self.0.contains(&variant)
    }

    /// Check if no variant is active
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate active variants
    pub fn iter(&self) -> impl Iterator<Item = Variant> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Variant> for VariantSet {
    fn from_iter<I: IntoIterator<Item = Variant>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Parsed method: base plus variants
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Method {
    /// Base method
    pub base: BaseMethod,
    /// Active variants
    pub variants: VariantSet,
}

impl Method {
    /// Method without variants
    #[inline]
    #[must_use]
    pub fn new(base: BaseMethod) -> Self {
        Self {
            base,
            variants: VariantSet::new(),
        }
    }

    /// Add a variant
    #[inline]
    #[must_use]
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variants.insert(variant);
        self
    }

    /// Parse a method string (`adc2`, `cvs-adc3`, ...)
    ///
    /// # Errors
    /// Returns [`AdcError::InvalidMethod`] for anything but a base method
    /// with an optional single `cvs-` prefix
    pub fn parse(method: &str) -> Result<Self, AdcError> {
        let invalid = || AdcError::InvalidMethod(method.to_string());

        let (prefix, base) = match method.split_once('-') {
            Some((prefix, base)) => (Some(prefix), base),
            None => (None, method),
        };
        let base: BaseMethod = base.parse().map_err(|_| invalid())?;

        match prefix {
            None => Ok(Self::new(base)),
            Some("cvs") => Ok(Self::new(base).with_variant(Variant::Cvs)),
            Some(_) => Err(invalid()),
        }
    }

    /// ADC class
    #[inline]
    #[must_use]
    pub fn class(&self) -> AdcClass {
        self.base.class()
    }

    /// Perturbation-theory level
    #[inline]
    #[must_use]
    pub fn level(&self) -> u8 {
        self.base.level()
    }

    /// Name of the method node below the class root
    ///
    /// PP: `adc2` becomes `adc2s`, then `ri_`, `sos_` and `cvs_` are
    /// prefixed in that order. IP: the `ip` prefix is dropped.
    #[must_use]
    pub fn variant_name(&self) -> String {
        variant_name(self.base, &self.variants)
    }

    /// Path of the method node (`adc_pp/cvs_adc2s`)
    #[must_use]
    pub fn tree_root(&self) -> TreePath {
        TreePath::single(self.class().tree_root()).child(self.variant_name())
    }
}

/// Method node name for `base` under `variants`
#[must_use]
pub fn variant_name(base: BaseMethod, variants: &VariantSet) -> String {
    match base.class() {
        AdcClass::Ip => base
            .name()
            .strip_prefix("ip")
            .unwrap_or(base.name())
            .to_string(),
        AdcClass::Pp => {
            let mut name = match base {
                BaseMethod::Adc2 => "adc2s".to_string(),
                other => other.name().to_string(),
            };
            for (variant, prefix) in [
                (Variant::Ri, "ri_"),
                (Variant::Sos, "sos_"),
                (Variant::Cvs, "cvs_"),
            ] {
                if variants.contains(variant) {
                    name.insert_str(0, prefix);
                }
            }
            name
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.variants.contains(Variant::Cvs) {
            f.write_str("cvs-")?;
        }
        f.write_str(self.base.name())
    }
}

impl FromStr for Method {
    type Err = AdcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_bases_and_cvs() {
        for base in BaseMethod::ALL {
            assert_eq!(Method::parse(base.name()).unwrap().base, base);

            let cvs = Method::parse(&format!("cvs-{base}")).unwrap();
            assert!(cvs.variants.contains(Variant::Cvs));
            assert_eq!(cvs.to_string(), format!("cvs-{base}"));
        }
    }

    #[test]
    fn parse_rejects_unknown() {
        for bad in ["adc4", "sf-adc2", "cvs-cvs-adc2", "cvs-", "", "ADC2", "adc2-cvs"] {
            assert!(
                matches!(Method::parse(bad), Err(AdcError::InvalidMethod(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn levels_and_classes() {
        assert_eq!(BaseMethod::Adc2x.level(), 2);
        assert_eq!(BaseMethod::IpAdc0.level(), 0);
        assert_eq!(BaseMethod::IpAdc3.class(), AdcClass::Ip);
        assert_eq!(BaseMethod::Adc1.class(), AdcClass::Pp);
    }

    #[test]
    fn variant_name_pp() {
        assert_eq!(Method::parse("adc2").unwrap().variant_name(), "adc2s");
        assert_eq!(Method::parse("adc2x").unwrap().variant_name(), "adc2x");
        assert_eq!(Method::parse("cvs-adc2").unwrap().variant_name(), "cvs_adc2s");
        assert_eq!(
            Method::new(BaseMethod::Adc3)
                .with_variant(Variant::Cvs)
                .with_variant(Variant::Sos)
                .with_variant(Variant::Ri)
                .variant_name(),
            "cvs_sos_ri_adc3"
        );
    }

    #[test]
    fn variant_name_ignores_spin_flip() {
        let sf = Method::new(BaseMethod::Adc2).with_variant(Variant::SpinFlip);
        assert_eq!(sf.variant_name(), "adc2s");
    }

    #[test]
    fn variant_name_ip_drops_prefix() {
        assert_eq!(Method::parse("ipadc3").unwrap().variant_name(), "adc3");
        assert_eq!(
            Method::parse("ipadc2").unwrap().tree_root().to_string(),
            "adc_ip/adc2"
        );
    }

    #[test]
    fn tree_root_pp() {
        assert_eq!(
            Method::parse("cvs-adc1").unwrap().tree_root().to_string(),
            "adc_pp/cvs_adc1"
        );
    }
}
