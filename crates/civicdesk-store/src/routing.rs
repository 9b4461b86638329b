//! Category → department routing.
//!
//! Each complaint is routed exactly once, when it is filed; the resulting
//! department and canned response are frozen into the stored record.

/// The department a complaint is assigned to, with the canned response
/// shown to the citizen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Routing {
    pub department: &'static str,
    pub response: &'static str,
}

const WATER: Routing = Routing {
    department: "Water Dept",
    response: "Check nearby leaks. Water Dept will resolve in 2 days.",
};

const ROAD: Routing = Routing {
    department: "Road Dept",
    response: "Avoid damaged road. Road Dept will repair in 3 days.",
};

const ELECTRICITY: Routing = Routing {
    department: "Electricity Dept",
    response: "Check main switch. Electricity Dept will inspect in 24 hours.",
};

const MUNICIPAL: Routing = Routing {
    department: "Municipal Dept",
    response: "Keep area clean. Municipal staff will resolve in 1 day.",
};

/// Route a complaint category (case-insensitive) to its department.
///
/// Unknown and empty categories fall back to the Municipal Dept.
pub fn route(category: &str) -> Routing {
    match category.to_lowercase().as_str() {
        "water" => WATER,
        "road" => ROAD,
        "electricity" => ELECTRICITY,
        _ => MUNICIPAL,
    }
}
