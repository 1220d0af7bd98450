use std::{collections::HashMap, sync::Arc};

use log::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    cfg::Error,
    provider::DegradationRecord,
    variance::{CnmpFn, FltFn, TropoFn, UdreFn, Udrei, UdreVariance, VarianceModel, VarianceRuntime},
};

/// Variance term an override applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Term {
    Tropo,
    Cnmp,
    Udre,
    Flt,
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tropo => write!(f, "tropo"),
            Self::Cnmp => write!(f, "cnmp"),
            Self::Udre => write!(f, "udre"),
            Self::Flt => write!(f, "flt"),
        }
    }
}

/// Registered override handle
#[derive(Clone)]
pub enum Override {
    Tropo(TropoFn),
    Cnmp(CnmpFn),
    Udre(UdreFn),
    Flt(FltFn),
}

impl Override {
    /// [Term] this handle replaces
    pub fn term(&self) -> Term {
        match self {
            Self::Tropo(_) => Term::Tropo,
            Self::Cnmp(_) => Term::Cnmp,
            Self::Udre(_) => Term::Udre,
            Self::Flt(_) => Term::Flt,
        }
    }
}

impl std::fmt::Debug for Override {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Override({})", self.term())
    }
}

/// [OverrideRegistry] maps names to variance functions.
/// Names are referenced by [OverrideConfig] and resolved once,
/// when the [VarianceModel] is built.
#[derive(Debug, Clone, Default)]
pub struct OverrideRegistry {
    entries: HashMap<String, Override>,
}

impl OverrideRegistry {
    /// Registers a tropospheric variance function
    pub fn register_tropo<F>(&mut self, name: &str, f: F) -> Option<Override>
    where
        F: Fn(&VarianceRuntime) -> f64 + Send + Sync + 'static,
    {
        self.insert(name, Override::Tropo(Arc::new(f)))
    }

    /// Registers a code noise and multipath variance function
    pub fn register_cnmp<F>(&mut self, name: &str, f: F) -> Option<Override>
    where
        F: Fn(&VarianceRuntime) -> f64 + Send + Sync + 'static,
    {
        self.insert(name, Override::Cnmp(Arc::new(f)))
    }

    /// Registers a UDRE variance function
    pub fn register_udre<F>(&mut self, name: &str, f: F) -> Option<Override>
    where
        F: Fn(&VarianceRuntime, Udrei, &DegradationRecord) -> UdreVariance + Send + Sync + 'static,
    {
        self.insert(name, Override::Udre(Arc::new(f)))
    }

    /// Registers a FLT variance function
    pub fn register_flt<F>(&mut self, name: &str, f: F) -> Option<Override>
    where
        F: Fn(&VarianceRuntime, f64, &DegradationRecord) -> f64 + Send + Sync + 'static,
    {
        self.insert(name, Override::Flt(Arc::new(f)))
    }

    /// Registers a handle, returning the one it replaces
    pub fn insert(&mut self, name: &str, handle: Override) -> Option<Override> {
        debug!("registering {} override \"{}\"", handle.term(), name);
        self.entries.insert(name.to_string(), handle)
    }

    /// Handle registered under this name
    pub fn get(&self, name: &str) -> Option<&Override> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves `name` for this [Term]
    fn resolve(&self, name: &str, term: Term) -> Result<Override, Error> {
        let handle = self
            .get(name)
            .ok_or_else(|| Error::UnknownOverride(name.to_string()))?;
        if handle.term() != term {
            return Err(Error::OverrideTerm {
                name: name.to_string(),
                expected: term,
                found: handle.term(),
            });
        }
        Ok(handle.clone())
    }
}

/// Per term override selection
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OverrideConfig {
    /// Tropospheric variance override name
    #[cfg_attr(feature = "serde", serde(default))]
    pub tropo: Option<String>,
    /// Code noise and multipath variance override name
    #[cfg_attr(feature = "serde", serde(default))]
    pub cnmp: Option<String>,
    /// UDRE variance override name
    #[cfg_attr(feature = "serde", serde(default))]
    pub udre: Option<String>,
    /// FLT variance override name
    #[cfg_attr(feature = "serde", serde(default))]
    pub flt: Option<String>,
    /// Use the built-in model (with a warning) when a name does not resolve,
    /// instead of failing.
    #[cfg_attr(feature = "serde", serde(default))]
    pub allow_fallback: bool,
}

impl OverrideConfig {
    fn lookup(
        &self,
        registry: &OverrideRegistry,
        name: Option<&String>,
        term: Term,
    ) -> Result<Option<Override>, Error> {
        let name = match name {
            Some(name) => name,
            None => return Ok(None),
        };
        match registry.resolve(name, term) {
            Ok(handle) => Ok(Some(handle)),
            Err(e) if self.allow_fallback => {
                warn!("{} - falling back to built-in {} model", e, term);
                Ok(None)
            },
            Err(e) => Err(e),
        }
    }

    /// Resolves every named override into a [VarianceModel]
    pub fn resolve(&self, registry: &OverrideRegistry) -> Result<VarianceModel, Error> {
        let mut model = VarianceModel::default();

        if let Some(Override::Tropo(f)) = self.lookup(registry, self.tropo.as_ref(), Term::Tropo)? {
            model.tropo = Some(f);
        }
        if let Some(Override::Cnmp(f)) = self.lookup(registry, self.cnmp.as_ref(), Term::Cnmp)? {
            model.cnmp = Some(f);
        }
        if let Some(Override::Udre(f)) = self.lookup(registry, self.udre.as_ref(), Term::Udre)? {
            model.udre = Some(f);
        }
        if let Some(Override::Flt(f)) = self.lookup(registry, self.flt.as_ref(), Term::Flt)? {
            model.flt = Some(f);
        }

        debug!("resolved variance model: {:?}", model);
        Ok(model)
    }
}
