//! The `/api/datos` list: CSV-like records kept in memory for the lifetime
//! of the process. Field casing on the wire is fixed by the front-end.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dato {
    pub id: u64,
    #[serde(rename = "Nombre")]
    pub nombre: String,
    #[serde(rename = "Apellido")]
    pub apellido: String,
    #[serde(rename = "Grupo")]
    pub grupo: String,
    #[serde(rename = "PuntosExtra")]
    pub puntos_extra: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewDato {
    #[serde(rename = "Nombre")]
    pub nombre: Option<String>,
    #[serde(rename = "Apellido")]
    pub apellido: Option<String>,
    #[serde(rename = "Grupo")]
    pub grupo: Option<String>,
    // `null` counts as present, a missing key does not.
    #[serde(rename = "PuntosExtra")]
    pub puntos_extra: Option<Value>,
}

/// Append-only list with an auto-increment id, owned by the app state so a
/// fresh one can be built per test.
#[derive(Debug, Default)]
pub struct DatoList {
    next_id: u64,
    items: Vec<Dato>,
}

impl DatoList {
    pub fn push(&mut self, nuevo: NewDato) -> Result<Dato, AppError> {
        let nombre = require_text(nuevo.nombre)?;
        let apellido = require_text(nuevo.apellido)?;
        let grupo = require_text(nuevo.grupo)?;
        let puntos_extra = nuevo.puntos_extra.ok_or(AppError::MissingFields)?;

        self.next_id += 1;
        let dato = Dato {
            id: self.next_id,
            nombre,
            apellido,
            grupo,
            puntos_extra,
        };
        self.items.push(dato.clone());

        Ok(dato)
    }

    pub fn all(&self) -> Vec<Dato> {
        self.items.clone()
    }
}

fn require_text(field: Option<String>) -> Result<String, AppError> {
    field
        .filter(|f| !f.is_empty())
        .ok_or(AppError::MissingFields)
}
