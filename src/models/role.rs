use serde::{Deserialize, Serialize};
use std::fmt;

/// Job role of an AppUser.
///
/// Stored with its French display name, which is also what the crews type.
/// Unknown names are kept verbatim as `Custom`, so companies created with
/// free-text roles still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Role {
    Administrateur,
    Surintendant,
    ChargeDeProjet,
    GestionnaireChauffeur,
    Chauffeur,
    GestionnaireCour,
    GestionnaireMecanique,
    Mecano,
    Contremaitre,
    Manoeuvre,
    Operateur,
    Estimateur,
    Custom(String),
}

impl Role {
    pub const ALL: [Role; 12] = [
        Role::Administrateur,
        Role::Surintendant,
        Role::ChargeDeProjet,
        Role::GestionnaireChauffeur,
        Role::Chauffeur,
        Role::GestionnaireCour,
        Role::GestionnaireMecanique,
        Role::Mecano,
        Role::Contremaitre,
        Role::Manoeuvre,
        Role::Operateur,
        Role::Estimateur,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Role::Administrateur => "Administrateur",
            Role::Surintendant => "Surintendant",
            Role::ChargeDeProjet => "Chargé de projet",
            Role::GestionnaireChauffeur => "Gestionnaire Chauffeur",
            Role::Chauffeur => "Chauffeur",
            Role::GestionnaireCour => "Gestionnaire Cour",
            Role::GestionnaireMecanique => "Gestionnaire Mécanique",
            Role::Mecano => "Mécano",
            Role::Contremaitre => "Contremaitre",
            Role::Manoeuvre => "Manœuvre",
            Role::Operateur => "Opérateur",
            Role::Estimateur => "Estimateur",
            Role::Custom(s) => s.as_str(),
        }
    }

    /// Parse a role from the CLI or the DB.
    ///
    /// Matching ignores case, accents, `œ` and separators, so
    /// `charge-de-projet`, `Chargé de projet` and `CHARGE_DE_PROJET` are equal.
    pub fn parse(s: &str) -> Self {
        let key = fold(s);
        Role::ALL
            .iter()
            .find(|r| fold(r.as_str()) == key)
            .cloned()
            .unwrap_or_else(|| Role::Custom(s.trim().to_string()))
    }

    /// Roles whose own shifts skip approval, and who manage the company.
    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Role::Administrateur | Role::Surintendant | Role::ChargeDeProjet
        )
    }

    /// Roles listed in the approval routing table.
    pub fn is_approver(&self) -> bool {
        self.is_admin()
            || matches!(
                self,
                Role::GestionnaireChauffeur
                    | Role::GestionnaireCour
                    | Role::GestionnaireMecanique
                    | Role::Contremaitre
            )
    }

    pub fn needs_machine(&self) -> bool {
        matches!(self, Role::Operateur)
    }

    pub fn needs_plate(&self) -> bool {
        matches!(self, Role::Chauffeur)
    }
}

fn fold(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.trim().chars().flat_map(char::to_lowercase) {
        match c {
            'é' | 'è' | 'ê' | 'ë' => out.push('e'),
            'à' | 'â' => out.push('a'),
            'î' | 'ï' => out.push('i'),
            'ô' => out.push('o'),
            'û' | 'ù' => out.push('u'),
            'ç' => out.push('c'),
            'œ' => out.push_str("oe"),
            ' ' | '-' | '_' => {}
            other => out.push(other),
        }
    }
    out
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Role::parse(&s)
    }
}

impl From<Role> for String {
    fn from(r: Role) -> Self {
        r.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ignores_accents_and_separators() {
        assert_eq!(Role::parse("charge-de-projet"), Role::ChargeDeProjet);
        assert_eq!(Role::parse("MANOEUVRE"), Role::Manoeuvre);
        assert_eq!(Role::parse("Opérateur"), Role::Operateur);
        assert_eq!(Role::parse("gestionnaire_mecanique"), Role::GestionnaireMecanique);
    }

    #[test]
    fn unknown_role_is_kept() {
        assert_eq!(Role::parse("Mécanicien"), Role::Custom("Mécanicien".into()));
        assert!(!Role::parse("Mécanicien").is_approver());
    }
}
