//! Task catalogue
//!
//! A [`Task`] is a named, stateless rule contributing a parameter tree
//! fragment. The catalogue is a closed table indexed by [`TaskId`]; its
//! dependency edges form a DAG (see [`crate::dag::TaskGraph`]).

mod adc;
pub mod common;
mod density;
mod mp;

use crate::error::ResolveError;
use crate::method::BaseMethod;
use crate::request::AdcRequest;
use adc_tree::ParameterTree;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Identifier of a catalogue task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskId {
    /// HF properties
    Hf,
    /// MP1 amplitudes
    Mp1,
    /// MP2 energy and density
    Mp2,
    /// Pi3/Pi4/Pi5 intermediates
    PiOovv,
    /// Second-order doubles amplitudes
    Mp2Td2,
    /// MP3 energy
    Mp3,
    /// Pia intermediates
    Pia,
    /// Pib intermediates
    Pib,
    /// Third-order ground state density
    DysonExpansionMethod,
    /// PP-ADC(0)
    Adc0,
    /// PP-ADC(1)
    Adc1,
    /// PP-ADC(2)
    Adc2,
    /// PP-ADC(2)-x
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

impl TaskId {
    /// All tasks in catalogue order
    pub const ALL: [Self; 17] = [
        Self::Hf,
        Self::Mp1,
        Self::Mp2,
        Self::PiOovv,
        Self::Mp2Td2,
        Self::Mp3,
        Self::Pia,
        Self::Pib,
        Self::DysonExpansionMethod,
        Self::Adc0,
        Self::Adc1,
        Self::Adc2,
        Self::Adc2x,
        Self::Adc3,
        Self::IpAdc0,
        Self::IpAdc2,
        Self::IpAdc3,
    ];

    /// Catalogue entry of this task
    #[must_use]
    pub fn task(self) -> &'static Task {
        &CATALOGUE[self as usize]
    }

    /// Unique task name
    #[inline]
    #[must_use]
    pub fn name(self) -> &'static str {
        self.task().name
    }

    /// Direct dependencies
    #[inline]
    #[must_use]
    pub fn dependencies(self) -> &'static [TaskId] {
        self.task().dependencies
    }
}

impl From<BaseMethod> for TaskId {
    fn from(base: BaseMethod) -> Self {
        match base {
            BaseMethod::Adc0 => Self::Adc0,
            BaseMethod::Adc1 => Self::Adc1,
            BaseMethod::Adc2 => Self::Adc2,
            BaseMethod::Adc2x => Self::Adc2x,
            BaseMethod::Adc3 => Self::Adc3,
            BaseMethod::IpAdc0 => Self::IpAdc0,
            BaseMethod::IpAdc2 => Self::IpAdc2,
            BaseMethod::IpAdc3 => Self::IpAdc3,
        }
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TaskId {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATALOGUE
            .iter()
            .find(|task| task.name == s)
            .map(|task| task.id)
            .ok_or_else(|| ResolveError::UnknownTask(s.to_string()))
    }
}

/// Contribution rule of a task
pub type ContributeFn = fn(&AdcRequest) -> ParameterTree;

/// Immutable catalogue entry
#[derive(Debug)]
pub struct Task {
    /// Identifier
    pub id: TaskId,
    /// Unique name
    pub name: &'static str,
    /// Direct dependencies, in declaration order
    pub dependencies: &'static [TaskId],
    contribute: ContributeFn,
}

impl Task {
    /// Parameters this task contributes for `request`
    #[must_use]
    pub fn parameters(&self, request: &AdcRequest) -> ParameterTree {
        (self.contribute)(request)
    }
}

fn adc0(request: &AdcRequest) -> ParameterTree {
    adc::parameters(BaseMethod::Adc0, request)
}

fn adc1(request: &AdcRequest) -> ParameterTree {
    adc::parameters(BaseMethod::Adc1, request)
}

fn adc2(request: &AdcRequest) -> ParameterTree {
    adc::parameters(BaseMethod::Adc2, request)
}

fn adc2x(request: &AdcRequest) -> ParameterTree {
    adc::parameters(BaseMethod::Adc2x, request)
}

fn adc3(request: &AdcRequest) -> ParameterTree {
    adc::parameters(BaseMethod::Adc3, request)
}

fn ipadc0(request: &AdcRequest) -> ParameterTree {
    adc::parameters(BaseMethod::IpAdc0, request)
}

fn ipadc2(request: &AdcRequest) -> ParameterTree {
    adc::parameters(BaseMethod::IpAdc2, request)
}

fn ipadc3(request: &AdcRequest) -> ParameterTree {
    adc::parameters(BaseMethod::IpAdc3, request)
}

const fn task(
    id: TaskId,
    name: &'static str,
    dependencies: &'static [TaskId],
    contribute: ContributeFn,
) -> Task {
    Task {
        id,
        name,
        dependencies,
        contribute,
    }
}

/// The catalogue, indexed by `TaskId as usize`
static CATALOGUE: [Task; 17] = [
    task(TaskId::Hf, "hf", &[], mp::hf),
    task(TaskId::Mp1, "mp1", &[TaskId::Hf], mp::mp1),
    task(TaskId::Mp2, "mp2", &[TaskId::Mp1], mp::mp2),
    task(TaskId::PiOovv, "pi_oovv", &[TaskId::Mp1], mp::pi_oovv),
    task(TaskId::Mp2Td2, "mp2td2", &[TaskId::Mp2, TaskId::PiOovv], mp::mp2td2),
    task(TaskId::Mp3, "mp3", &[TaskId::Mp2Td2], mp::mp3),
    task(TaskId::Pia, "pia", &[TaskId::Mp1], mp::pia),
    task(TaskId::Pib, "pib", &[TaskId::Mp1], mp::pib),
    task(
        TaskId::DysonExpansionMethod,
        "dyson_expansion_method",
        &[TaskId::Mp3, TaskId::Pia, TaskId::Pib],
        density::dyson_expansion_method,
    ),
    task(TaskId::Adc0, "adc0", &[TaskId::Hf], adc0),
    task(TaskId::Adc1, "adc1", &[TaskId::Mp1], adc1),
    task(TaskId::Adc2, "adc2", &[TaskId::Mp2Td2], adc2),
    task(TaskId::Adc2x, "adc2x", &[TaskId::Mp2Td2], adc2x),
    task(TaskId::Adc3, "adc3", &[TaskId::DysonExpansionMethod], adc3),
    task(TaskId::IpAdc0, "ipadc0", &[TaskId::Hf], ipadc0),
    task(TaskId::IpAdc2, "ipadc2", &[TaskId::Mp2], ipadc2),
    task(TaskId::IpAdc3, "ipadc3", &[TaskId::DysonExpansionMethod], ipadc3),
];

/// All catalogue entries
#[inline]
#[must_use]
pub fn catalogue() -> &'static [Task] {
    &CATALOGUE
}
