/// Request and response bodies of the Eco-RVM backend endpoints.
///
/// Field names follow the wire format (Spanish, snake_case). Every response
/// field is optional: the dashboard renders whatever subset the server sent
/// and ignores anything it does not know.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// POST /api/rewards/redeem
// ---------------------------------------------------------------------------

/// Request body for `POST /api/rewards/redeem`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemRequest {
    pub usuario_id: u64,
    pub recompensa_id: u64,
}

/// Response body for `POST /api/rewards/redeem`, on success and on failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedeemResponse {
    /// Missing is treated like `false`.
    #[serde(default)]
    pub exito: Option<bool>,
    #[serde(default)]
    pub codigo_canje: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    /// Human-readable confirmation sent alongside a successful redemption.
    #[serde(default)]
    pub mensaje: Option<String>,
    #[serde(default)]
    pub puntos_restantes: Option<i64>,
}

impl RedeemResponse {
    pub fn succeeded(&self) -> bool {
        self.exito.unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// GET /api/stats/dashboard
// ---------------------------------------------------------------------------

/// Response body for `GET /api/stats/dashboard`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub estadisticas: Option<GeneralStats>,
    #[serde(default)]
    pub impacto_ambiental: Option<EnvironmentalImpact>,
    /// Recycling count per ISO date, in the order the server sent them.
    #[serde(default)]
    pub reciclajes_semana: Option<IndexMap<String, u64>>,
    #[serde(default)]
    pub top_recicladores: Option<Vec<TopRecycler>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralStats {
    pub total_usuarios: i64,
    pub total_transacciones: i64,
    pub total_puntos_sistema: i64,
    #[serde(default)]
    pub promedio_puntos_usuario: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalImpact {
    pub co2_evitado_kg: f64,
    pub peso_reciclado_kg: f64,
    #[serde(default)]
    pub total_reciclajes: Option<i64>,
    #[serde(default)]
    pub equivalencias: Option<Equivalences>,
}

/// What the recycled material is worth in everyday terms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equivalences {
    #[serde(default)]
    pub arboles_plantados: f64,
    #[serde(default)]
    pub litros_agua_ahorrados: f64,
    #[serde(default)]
    pub kwh_energia_ahorrada: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopRecycler {
    pub posicion: u32,
    #[serde(default)]
    pub usuario: RecyclerUser,
    #[serde(default)]
    pub reciclajes_mes: i64,
    #[serde(default)]
    pub puntos_mes: i64,
}

/// The subset of the user record the leaderboard shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecyclerUser {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub nombre: Option<String>,
}

impl RecyclerUser {
    pub fn display_name(&self) -> String {
        match (&self.nombre, self.id) {
            (Some(name), _) if !name.trim().is_empty() => name.trim().to_string(),
            (_, Some(id)) => format!("#{id}"),
            _ => "—".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
