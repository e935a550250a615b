//! Configuration module for the form engine.
//!
//! Everything the page used to inject as globals is loaded once from environment
//! variables with sensible defaults and handed to the engine as one immutable value.

use std::env;
use std::time::Duration;

use crate::errors::FormError;

/// Token replaced by the entity id in the delete URL template.
pub const DEFAULT_ID_PLACEHOLDER: &str = "{id}";

/// Page context and endpoints for one form instance.
#[derive(Debug, Clone)]
pub struct FormConfig {
    /// "Type of person" context variable of the page, if any
    pub person_type_context: Option<String>,
    /// Data source of the external persons list widget
    pub list_url: String,
    /// Delete URL with `id_placeholder` standing in for the entity id
    pub delete_url_template: String,
    /// Token inside `delete_url_template` to substitute
    pub id_placeholder: String,
    /// Brigade lookup endpoint (takes `point_id`)
    pub brigades_url: String,
    /// Role lookup endpoint (takes `personnel_type`)
    pub roles_url: String,
    /// Personnel type id that disables brigade and production in a row
    pub coordination_team_id: String,
    /// Where to go after a successful delete
    pub home_url: String,
    /// Where the clear button sends the user
    pub create_person_url: String,
    /// Locale resource for the list widget
    pub locale_url: String,
    /// Timeout applied to every outbound request
    pub request_timeout: Duration,
    /// Delay before a name field is upper-cased after a keystroke
    pub normalize_delay: Duration,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl FormConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, FormError> {
        dotenvy::dotenv().ok();

        let person_type_context = env::var("PERSONA_PERSON_TYPE")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let list_url = var_or("PERSONA_LIST_URL", "http://127.0.0.1:8000/persona/listar-persona");
        let delete_url_template = var_or(
            "PERSONA_DELETE_URL",
            "http://127.0.0.1:8000/persona/eliminar/{id}",
        );
        let id_placeholder = var_or("PERSONA_DELETE_PLACEHOLDER", DEFAULT_ID_PLACEHOLDER);
        let brigades_url = var_or(
            "PERSONA_BRIGADES_URL",
            "http://127.0.0.1:8000/asignacion/consulta-brigada",
        );
        let roles_url = var_or(
            "PERSONA_ROLES_URL",
            "http://127.0.0.1:8000/asignacion/rol-profesional",
        );
        let coordination_team_id = var_or("PERSONA_COORDINATION_TEAM_ID", "equipo_coordinacion");
        let home_url = var_or("PERSONA_HOME_URL", "/");
        let create_person_url = var_or("PERSONA_CREATE_URL", "/persona/crear-persona");
        let locale_url = var_or("PERSONA_LOCALE_URL", "/static/datatables/es.json");

        let request_timeout = Duration::from_millis(millis_var("PERSONA_REQUEST_TIMEOUT_MS", 10_000)?);
        let normalize_delay = Duration::from_millis(millis_var("PERSONA_NORMALIZE_DELAY_MS", 50)?);

        let log_level = var_or("PERSONA_LOG_LEVEL", "info");

        if !delete_url_template.contains(&id_placeholder) {
            return Err(FormError::Config(format!(
                "PERSONA_DELETE_URL {:?} does not contain placeholder {:?}",
                delete_url_template, id_placeholder
            )));
        }

        Ok(Self {
            person_type_context,
            list_url,
            delete_url_template,
            id_placeholder,
            brigades_url,
            roles_url,
            coordination_team_id,
            home_url,
            create_person_url,
            locale_url,
            request_timeout,
            normalize_delay,
            log_level,
        })
    }

    /// Delete URL for one entity.
    pub fn delete_url(&self, entity_id: &str) -> String {
        self.delete_url_template
            .replacen(&self.id_placeholder, entity_id, 1)
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn millis_var(key: &str, default: u64) -> Result<u64, FormError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| FormError::Config(format!("Invalid {} value {:?}", key, raw))),
        Err(_) => Ok(default),
    }
}
