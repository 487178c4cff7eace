use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::models::project::{
    CalculationMode, Project, ProjectInputs, ProjectPatch, ProjectResult, StoreLoad,
};
use crate::services::estimation;
use crate::services::storage::StorageSlot;

/// Ordered project collection mirrored to a single storage slot.
///
/// Most recent first. Every effective mutation rewrites the whole collection;
/// memory is only updated once the write went through.
pub struct ProjectStore {
    slot: Box<dyn StorageSlot>,
    key: String,
    projects: Vec<Project>,
    load: StoreLoad,
}

impl ProjectStore {
    /// Reads the slot once. Never fails: an empty slot is seeded with the
    /// demonstration projects, an unreadable one is replaced in memory only.
    pub fn init(slot: Box<dyn StorageSlot>, key: impl Into<String>) -> Self {
        let key = key.into();
        let (projects, load) = match slot.read(&key) {
            Ok(Some(raw)) if raw.trim().is_empty() => (seed_projects(), StoreLoad::Seeded),
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Project>>(&raw) {
                Ok(projects) => (projects, StoreLoad::Loaded),
                Err(e) => {
                    warn!(key = %key, error = %e, "persisted projects unparsable, using demo set");
                    (seed_projects(), StoreLoad::RecoveredFromCorruption)
                }
            },
            Ok(None) => (seed_projects(), StoreLoad::Seeded),
            Err(e) => {
                warn!(key = %key, error = %e, "persisted projects unreadable, using demo set");
                (seed_projects(), StoreLoad::RecoveredFromCorruption)
            }
        };

        let mut store = Self { slot, key, projects: Vec::new(), load };
        if load == StoreLoad::Seeded {
            if let Err(e) = store.commit(projects.clone()) {
                warn!(error = %e, "could not persist demo projects");
            }
        }
        store.projects = projects;
        info!(key = %store.key, projects = store.projects.len(), load = ?store.load, "project store ready");
        store
    }

    pub fn list(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn load_outcome(&self) -> StoreLoad {
        self.load
    }

    /// Prepends a new project with a fresh id and persists the collection.
    pub fn add(&mut self, inputs: ProjectInputs, result: ProjectResult) -> Result<Project, StoreError> {
        let now = Utc::now();
        let project = Project {
            id: self.fresh_id(),
            created_at: now,
            updated_at: now,
            inputs,
            result,
        };

        let mut next = Vec::with_capacity(self.projects.len() + 1);
        next.push(project.clone());
        next.extend(self.projects.iter().cloned());
        self.commit(next)?;

        info!(id = %project.id, name = %project.inputs.name, "project added");
        Ok(project)
    }

    /// Merges `patch` into the project and bumps `updated_at`. Unknown ids are ignored.
    pub fn update(&mut self, id: &str, patch: ProjectPatch) -> Result<(), StoreError> {
        let Some(index) = self.projects.iter().position(|p| p.id == id) else {
            debug!(id, "update ignored, no such project");
            return Ok(());
        };

        let mut next = self.projects.clone();
        let project = &mut next[index];
        if let Some(inputs) = patch.inputs {
            project.inputs = inputs;
        }
        if let Some(result) = patch.result {
            project.result = result;
        }
        project.updated_at = Utc::now();
        self.commit(next)?;

        info!(id, "project updated");
        Ok(())
    }

    /// Deletes the project if present. Unknown ids are ignored.
    pub fn remove(&mut self, id: &str) -> Result<(), StoreError> {
        if self.get(id).is_none() {
            debug!(id, "remove ignored, no such project");
            return Ok(());
        }

        let next: Vec<Project> = self.projects.iter().filter(|p| p.id != id).cloned().collect();
        self.commit(next)?;

        info!(id, "project removed");
        Ok(())
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = uuid::Uuid::new_v4().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn commit(&mut self, next: Vec<Project>) -> Result<(), StoreError> {
        let payload = serde_json::to_string(&next)?;
        self.slot.write(&self.key, &payload)?;
        #[cfg(feature = "verbose_log")]
        debug!(key = %self.key, bytes = payload.len(), projects = next.len(), "projects persisted");
        self.projects = next;
        Ok(())
    }
}

/// Demonstration projects used on first run and when the slot is unreadable.
pub fn seed_projects() -> Vec<Project> {
    let now = Utc::now();
    let demo = |id: &str, inputs: ProjectInputs| {
        let result = estimation::estimate(&inputs);
        Project { id: id.to_string(), created_at: now, updated_at: now, inputs, result }
    };

    vec![
        demo(
            "demo-on-grid",
            ProjectInputs {
                name: "Centre logistique Lyon".to_string(),
                client: "LogisFrance".to_string(),
                location: "Lyon, France".to_string(),
                mode: CalculationMode::OnGrid,
                peak_power_kw: 120.0,
                daily_consumption_kwh: 680.0,
                irradiance: 4.2,
                storage_capacity_kwh: 45.0,
                investment: 185_000.0,
                tariff: 0.18,
                horizon_years: 15,
            },
        ),
        demo(
            "demo-pompage",
            ProjectInputs {
                name: "Station pompage Sahel".to_string(),
                client: "AquaFarm".to_string(),
                location: "Saint-Louis, Sénégal".to_string(),
                mode: CalculationMode::Pumping,
                peak_power_kw: 45.0,
                daily_consumption_kwh: 210.0,
                irradiance: 5.8,
                storage_capacity_kwh: 30.0,
                investment: 86_000.0,
                tariff: 0.11,
                horizon_years: 12,
            },
        ),
    ]
}
