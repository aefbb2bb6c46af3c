use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A tutor configuration: the directive sent with every turn plus a suggested
/// opening utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    pub name: String,
    pub description: String,
    pub system_instruction: String,
    pub starter_prompt: String,
}

#[derive(Debug, Deserialize)]
struct BuiltinPersonaConfig {
    personas: Vec<Persona>,
}

pub fn load_builtin_personas() -> Vec<Persona> {
    const CONFIG_CONTENT: &str = include_str!("../builtins/personas.toml");
    let config: BuiltinPersonaConfig =
        toml::from_str(CONFIG_CONTENT).expect("Failed to parse builtins/personas.toml");
    config.personas
}

/// Errors raised while assembling the persona catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog would contain no personas at all.
    Empty,
    /// Two personas share the same id.
    DuplicateId(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Empty => write!(f, "Persona catalog is empty"),
            CatalogError::DuplicateId(id) => {
                write!(f, "Persona id '{id}' is defined more than once")
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// Ordered, read-only list of personas fixed at startup.
///
/// Order is display order and the first entry is the default persona, so the
/// catalog is never empty.
#[derive(Debug, Clone)]
pub struct PersonaCatalog {
    personas: Vec<Persona>,
}

impl PersonaCatalog {
    /// Catalog made of the personas shipped with the binary.
    pub fn builtin() -> Self {
        Self {
            personas: load_builtin_personas(),
        }
    }

    /// Build a catalog from an explicit list, rejecting empty lists and
    /// duplicate ids.
    pub fn from_personas(personas: Vec<Persona>) -> Result<Self, CatalogError> {
        if personas.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for persona in &personas {
            if !seen.insert(persona.id.as_str()) {
                return Err(CatalogError::DuplicateId(persona.id.clone()));
            }
        }

        Ok(Self { personas })
    }

    /// Built-in personas followed by user-defined ones from the config file.
    pub fn with_extra(extra: &[Persona]) -> Result<Self, CatalogError> {
        let mut personas = load_builtin_personas();
        personas.extend(extra.iter().cloned());
        Self::from_personas(personas)
    }

    pub fn list_personas(&self) -> &[Persona] {
        &self.personas
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Persona> {
        self.personas.get(index)
    }

    pub fn default_persona(&self) -> &Persona {
        &self.personas[0]
    }

    pub fn find_persona_by_id(&self, id: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.personas.iter().position(|p| p.id == id)
    }

    /// Resolve an id to its catalog index, listing the valid ids on failure.
    pub fn resolve_index(&self, id: &str) -> Result<usize, String> {
        self.position(id).ok_or_else(|| {
            let available_ids: Vec<&str> = self.personas.iter().map(|p| p.id.as_str()).collect();
            format!(
                "Persona '{}' not found. Available personas: {}",
                id,
                available_ids.join(", ")
            )
        })
    }
}
