// Copyright contributors to the quil-frontend project
// SPDX-License-Identifier: Apache-2.0

//! The catalog of built-in template waveforms.
//!
//! A waveform written with named parameters must name one of these templates;
//! a bare waveform name is a reference resolved against `DEFWAVEFORM`
//! definitions downstream. `DEFWAVEFORM` may not shadow a template.

use hashbrown::HashSet;
use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::ast::{TemplateWaveform, Waveform};
use crate::expression::Expression;

const TEMPLATE_NAMES: &[&str] = &[
    "flat",
    "gaussian",
    "drag_gaussian",
    "hrm_gaussian",
    "erf_square",
    "boxcar_kernel",
];

pub struct WaveformCatalog {
    templates: HashSet<&'static str>,
}

impl WaveformCatalog {
    pub fn standard() -> WaveformCatalog {
        WaveformCatalog {
            templates: TEMPLATE_NAMES.iter().copied().collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains(name)
    }

    /// Instantiate `name` with `parameters`, or `None` if no such template.
    pub fn instantiate(
        &self,
        name: &str,
        parameters: IndexMap<String, Expression>,
    ) -> Option<Waveform> {
        self.templates.get(name).map(|template| {
            Waveform::Template(TemplateWaveform {
                name: template.to_string(),
                parameters,
            })
        })
    }
}

pub static STANDARD_WAVEFORMS: Lazy<WaveformCatalog> = Lazy::new(WaveformCatalog::standard);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_are_known() {
        for name in TEMPLATE_NAMES {
            assert!(STANDARD_WAVEFORMS.contains(name));
        }
        assert!(!STANDARD_WAVEFORMS.contains("my_custom_waveform"));
    }
}
