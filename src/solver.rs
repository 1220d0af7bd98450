//! Integrity solver
use itertools::Itertools;
use log::{debug, error, info};

use crate::{
    cfg::{Config, Error as ConfigError, OverrideRegistry},
    error::Error,
    geometry::GeometryProvider,
    observation::{ObservationContext, ObservationKind, SbasObservation},
    prelude::Epoch,
    protection::ProtectionLevelEngine,
    provider::{IonosphereGrid, MasterStation},
    solutions::EpochSolution,
    variance::VarianceModel,
};

/// [Solver] resolves the protection levels of each epoch
/// from the geometry, integrity and ionospheric data providers.
#[derive(Debug, Clone)]
pub struct Solver {
    /// Solver parametrization
    pub cfg: Config,
    /// [VarianceModel], overrides resolved
    model: VarianceModel,
    /// [ProtectionLevelEngine]
    engine: ProtectionLevelEngine,
}

impl Solver {
    /// Creates a new [Solver], resolving the variance overrides
    /// named in [Config] through this [OverrideRegistry].
    pub fn new(cfg: &Config, registry: &OverrideRegistry) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let model = cfg.variance_model(registry)?;
        let engine = ProtectionLevelEngine::from_config(cfg);
        info!(
            "{} {} solver deployed (K_V={}, K_H={})",
            cfg.class, cfg.mode, engine.k_v, engine.k_h
        );
        Ok(Self {
            cfg: cfg.clone(),
            model,
            engine,
        })
    }

    /// [VarianceModel] in use
    pub fn variance_model(&self) -> &VarianceModel {
        &self.model
    }

    /// [ProtectionLevelEngine] in use
    pub fn engine(&self) -> &ProtectionLevelEngine {
        &self.engine
    }

    /// Resolves the [EpochSolution] at this [Epoch].
    /// Satellites below the elevation mask are not used, and only the first
    /// line of sight of each satellite is retained.
    /// Observations that cannot be formed are logged and dropped.
    pub fn resolve<'a, G: GeometryProvider>(
        &self,
        t: Epoch,
        geometry: &'a G,
        master: &dyn MasterStation,
        grid: Option<&dyn IonosphereGrid>,
        kind: ObservationKind,
    ) -> Result<EpochSolution<'a>, Error> {
        let epoch = geometry.geometry(t).ok_or(Error::MissingGeometry(t))?;

        let ctx = ObservationContext {
            model: &self.model,
            master,
            grid,
            class: self.cfg.class,
            mode: self.cfg.mode,
            shell_height_km: self.cfg.shell_height_km,
        };

        let mut observations = Vec::with_capacity(epoch.lines_of_sight.len());

        for los in epoch.lines_of_sight.iter().unique_by(|los| los.sv) {
            if los.elevation_deg < self.cfg.min_elevation_deg {
                debug!(
                    "{} ({}) - below elevation mask ({:.1}°)",
                    t, los.sv, los.elevation_deg
                );
                continue;
            }
            match SbasObservation::new(t, kind, &epoch.user, los, &ctx) {
                Ok(obs) => observations.push(obs),
                Err(e) => error!("{} ({}) - {}", t, los.sv, e),
            }
        }

        let protection = self.engine.resolve(&observations)?;

        let available = self
            .cfg
            .alert_limits
            .as_ref()
            .map(|limits| protection.is_available(limits));

        let observations = observations
            .into_iter()
            .map(|obs| obs.with_protection(protection))
            .collect();

        Ok(EpochSolution {
            t,
            kind,
            observations,
            protection,
            available,
        })
    }

    /// Resolves each [Epoch] independently.
    /// Failing epochs are logged and skipped.
    pub fn resolve_batch<'a, G: GeometryProvider>(
        &self,
        epochs: impl IntoIterator<Item = Epoch>,
        geometry: &'a G,
        master: &dyn MasterStation,
        grid: Option<&dyn IonosphereGrid>,
        kind: ObservationKind,
    ) -> Vec<EpochSolution<'a>> {
        epochs
            .into_iter()
            .filter_map(|t| match self.resolve(t, geometry, master, grid, kind) {
                Ok(solution) => Some(solution),
                Err(e) => {
                    error!("{} - {}", t, e);
                    None
                },
            })
            .collect()
    }
}
