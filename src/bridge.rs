//! High-level orchestration of one bolometric-correction run.
//!
//! [`BoloBridge`] owns the validated toolkit config, the filter registry and
//! the invocation options, and walks the pipeline in its fixed order:
//! select filter set → encode star records → invoke the toolkit → decode
//! results. The shared toolkit files are unsynchronized; concurrent bridges
//! pointed at the same root race with undefined results.

use crate::config::{BoloConfig, ToolkitFlavor};
use crate::errors::BoloResult;
use crate::input::{self, StarRecord};
use crate::output::{self, BcResults};
use crate::process::{self, InvokeOptions, ProcessOutput};
use crate::registry::Registry;
use crate::selection;
use std::time::Duration;

pub struct BoloBridge {
    config: BoloConfig,

    registry: Registry,

    options: InvokeOptions,
}

impl BoloBridge {
    /// Bridge with the built-in registry and default invocation options
    /// (strict, no timeout).
    pub fn new(config: BoloConfig) -> BoloResult<Self> {
        Ok(Self {
            config,
            registry: Registry::standard()?,
            options: InvokeOptions::default(),
        })
    }

    pub fn builder(config: BoloConfig) -> BoloBridgeBuilder {
        BoloBridgeBuilder::new(config)
    }

    pub fn config(&self) -> &BoloConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Rewrite the toolkit's selection file to activate `set_name`.
    pub fn select_filter_set(&self, set_name: &str) -> BoloResult<()> {
        selection::select_filter_set(&self.config, &self.registry, set_name)
    }

    /// Encode star parameters into the input file of the active flavor.
    pub fn write_star_records<S: AsRef<str>>(
        &self,
        ids: &[S],
        logg: &[f64],
        feh: &[f64],
        teff: &[f64],
        ebv: &[f64],
    ) -> BoloResult<()> {
        input::write_star_records(&self.config.input_file(), ids, logg, feh, teff, ebv)
    }

    pub fn write_stars(&self, stars: &[StarRecord]) -> BoloResult<()> {
        input::write_stars(&self.config.input_file(), stars)
    }

    /// Invoke the toolkit executable from its codes directory and block
    /// until it terminates.
    pub fn run(&self) -> BoloResult<ProcessOutput> {
        let (program, args) = self.config.invocation();
        log::info!(
            "running {} {:?} in {}",
            program.display(),
            args,
            self.config.codes_dir().display()
        );
        process::invoke(&program, &args, &self.config.codes_dir(), &self.options)
    }

    /// Decode the results file using `set_name`'s schema.
    pub fn read_results(&self, set_name: &str) -> BoloResult<BcResults> {
        let set = self.registry.filter_set(set_name)?;
        output::read_results(&self.config.output_file(), &self.registry, set)
    }

    /// The full pipeline for one batch of stars.
    pub fn compute<S: AsRef<str>>(
        &self,
        set_name: &str,
        ids: &[S],
        logg: &[f64],
        feh: &[f64],
        teff: &[f64],
        ebv: &[f64],
    ) -> BoloResult<BcResults> {
        self.select_filter_set(set_name)?;
        self.write_star_records(ids, logg, feh, teff, ebv)?;
        self.run()?;
        self.read_results(set_name)
    }
}

pub struct BoloBridgeBuilder {
    config: BoloConfig,

    registry: Option<Registry>,

    options: InvokeOptions,
}

impl BoloBridgeBuilder {
    pub fn new(config: BoloConfig) -> Self {
        Self {
            config,
            registry: None,
            options: InvokeOptions::default(),
        }
    }

    /// Replace the built-in registry, e.g. with a table extended through
    /// [`Registry::from_tables`].
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_flavor(mut self, flavor: ToolkitFlavor) -> Self {
        self.config = self.config.with_flavor(flavor);
        self
    }

    /// `false` restores the legacy fire-and-forget exit handling.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.options.strict = strict;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> BoloResult<BoloBridge> {
        let registry = match self.registry {
            Some(registry) => registry,
            None => Registry::standard()?,
        };
        Ok(BoloBridge {
            config: self.config,
            registry,
            options: self.options,
        })
    }
}
