use std::error::Error;

use crate::core::config::Config;
use crate::core::persona::{Persona, PersonaCatalog};

pub fn list_personas() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let catalog = PersonaCatalog::with_extra(&config.personas)?;
    print!("{}", format_persona_list(&catalog, config.default_persona.as_deref()));
    Ok(())
}

fn format_persona_list(catalog: &PersonaCatalog, default_id: Option<&str>) -> String {
    let default_id = default_id.unwrap_or_else(|| catalog.default_persona().id.as_str());
    let mut out = String::from("Available personas:\n\n");
    for persona in catalog.list_personas() {
        out.push_str(&persona_entry(persona, persona.id == default_id));
    }
    out.push_str("\n💡 Start with a persona using:\n   edubots -p <persona_id>\n");
    out
}

fn persona_entry(persona: &Persona, is_default: bool) -> String {
    let marker = if is_default { " (default)" } else { "" };
    format!(
        "  • {} - {}{}\n    {}\n",
        persona.id, persona.name, marker, persona.description
    )
}
