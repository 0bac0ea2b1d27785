//! Studio master data: skills, repeat clients, and event templates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::money;
use crate::types::{new_id, ClientDetails, EventItem, TeamMember};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillMaster {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientMaster {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ClientMaster {
    /// Copy contact fields into a quotation's client block and link the id.
    pub fn apply_to(&self, client: &mut ClientDetails) {
        client.id = Some(self.id.clone());
        client.name = self.name.clone();
        client.company = self.company.clone();
        client.phone = self.phone.clone();
        client.email = self.email.clone();
        client.address = self.address.clone();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub default_duration: String,
    #[serde(default)]
    pub default_team: Vec<TeamMember>,
    #[serde(default, with = "money::lenient_price")]
    pub default_cost: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EventTemplate {
    /// A fresh event pre-filled from this template; date and venue undecided.
    pub fn instantiate(&self) -> EventItem {
        EventItem {
            id: new_id("evt"),
            name: self.name.clone(),
            duration: self.default_duration.clone(),
            team: self.default_team.clone(),
            approx_cost: self.default_cost,
            ..Default::default()
        }
    }
}

/// All master data a studio keeps between quotations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Catalog {
    pub skills: Vec<SkillMaster>,
    pub clients: Vec<ClientMaster>,
    pub templates: Vec<EventTemplate>,
}

impl Catalog {
    pub fn skill(&self, id: &str) -> Result<&SkillMaster, CoreError> {
        self.skills
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| CoreError::SkillNotFound(id.to_string()))
    }

    pub fn skill_name(&self, id: &str) -> Option<&str> {
        self.skills
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name.as_str())
    }

    pub fn client(&self, id: &str) -> Result<&ClientMaster, CoreError> {
        self.clients
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::ClientNotFound(id.to_string()))
    }

    pub fn template(&self, id: &str) -> Result<&EventTemplate, CoreError> {
        self.templates
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| CoreError::TemplateNotFound(id.to_string()))
    }

    /// Look a skill up by id, then by name (case-insensitive).
    pub fn find_skill(&self, key: &str) -> Result<&SkillMaster, CoreError> {
        let key = key.trim();
        self.skills
            .iter()
            .find(|s| s.id == key)
            .or_else(|| self.skills.iter().find(|s| s.name.eq_ignore_ascii_case(key)))
            .ok_or_else(|| CoreError::SkillNotFound(key.to_string()))
    }

    /// Like [`Catalog::find_skill`], but registers an unknown name as a new
    /// skill. Blank keys are rejected.
    pub fn skill_or_register(&mut self, key: &str) -> Result<&SkillMaster, CoreError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(CoreError::SkillNotFound(String::new()));
        }
        match self.skills.iter().position(|s| s.id == key) {
            Some(i) => Ok(&self.skills[i]),
            None => Ok(self.ensure_skill(key)),
        }
    }

    pub fn client_mut(&mut self, id: &str) -> Result<&mut ClientMaster, CoreError> {
        self.clients
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::ClientNotFound(id.to_string()))
    }

    /// Add a client master. An empty id is replaced with a generated one.
    pub fn add_client(&mut self, mut client: ClientMaster) -> String {
        if client.id.is_empty() {
            client.id = new_id("cli");
        }
        let id = client.id.clone();
        self.clients.push(client);
        id
    }

    pub fn remove_client(&mut self, id: &str) -> Result<ClientMaster, CoreError> {
        let idx = self
            .clients
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CoreError::ClientNotFound(id.to_string()))?;
        Ok(self.clients.remove(idx))
    }

    /// Add an event template. An empty id is replaced with a generated one;
    /// the default cost is clamped at zero.
    pub fn add_template(&mut self, mut template: EventTemplate) -> String {
        if template.id.is_empty() {
            template.id = new_id("tpl");
        }
        template.default_cost = money::non_negative(template.default_cost);
        let id = template.id.clone();
        self.templates.push(template);
        id
    }

    pub fn remove_template(&mut self, id: &str) -> Result<EventTemplate, CoreError> {
        let idx = self
            .templates
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CoreError::TemplateNotFound(id.to_string()))?;
        Ok(self.templates.remove(idx))
    }

    /// Register a skill by name, reusing an existing one with the same name.
    pub fn ensure_skill(&mut self, name: &str) -> &SkillMaster {
        let name = name.trim();
        let idx = match self
            .skills
            .iter()
            .position(|s| s.name.eq_ignore_ascii_case(name))
        {
            Some(i) => i,
            None => {
                self.skills.push(SkillMaster {
                    id: new_id("skl"),
                    name: name.to_string(),
                    description: None,
                });
                self.skills.len() - 1
            }
        };
        &self.skills[idx]
    }
}

fn skill(id: &str, name: &str) -> SkillMaster {
    SkillMaster {
        id: id.into(),
        name: name.into(),
        description: None,
    }
}

fn team(members: &[(&str, u32)]) -> Vec<TeamMember> {
    members
        .iter()
        .map(|(skill_id, count)| TeamMember {
            skill_id: skill_id.to_string(),
            count: *count,
        })
        .collect()
}

fn template(id: &str, name: &str, duration: &str, members: &[(&str, u32)], cost: i64) -> EventTemplate {
    EventTemplate {
        id: id.into(),
        name: name.into(),
        default_duration: duration.into(),
        default_team: team(members),
        default_cost: Decimal::from(cost),
        description: None,
    }
}

/// Catalog a new workspace starts with.
pub fn default_catalog() -> Catalog {
    Catalog {
        skills: vec![
            skill("s1", "Candid Photographer"),
            skill("s2", "Traditional Photographer"),
            skill("s3", "Cinematographer"),
            skill("s4", "Drone Pilot"),
            skill("s5", "Traditional Videographer"),
            skill("s6", "Album Designer"),
            skill("s7", "Assistant"),
        ],
        clients: vec![
            ClientMaster {
                id: "c1".into(),
                name: "Rahul Sharma & Priya Verma".into(),
                company: String::new(),
                phone: "+91-9876543210".into(),
                email: "rahul.priya@example.com".into(),
                address: String::new(),
                notes: Some("Referral from Instagram".into()),
            },
            ClientMaster {
                id: "c2".into(),
                name: "Amit & Neha".into(),
                company: "Tech Solutions Pvt Ltd".into(),
                phone: "+91-9988776655".into(),
                email: "amit.neha@gmail.com".into(),
                address: String::new(),
                notes: Some("Varanasi Local".into()),
            },
        ],
        templates: vec![
            template("t1", "Haldi Ceremony", "4–5 Hours", &[("s1", 1), ("s2", 1)], 25000),
            template(
                "t2",
                "Sangeet",
                "5–6 Hours",
                &[("s1", 1), ("s3", 1), ("s2", 1)],
                40000,
            ),
            template(
                "t3",
                "Wedding",
                "10–12 Hours",
                &[("s1", 1), ("s2", 1), ("s3", 1), ("s4", 1)],
                85000,
            ),
            template("t4", "Reception", "4–5 Hours", &[("s2", 1), ("s3", 1)], 30000),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_lookups() {
        let cat = default_catalog();
        assert_eq!(cat.skills.len(), 7);
        assert_eq!(cat.skill_name("s4"), Some("Drone Pilot"));
        assert_eq!(cat.skill_name("s99"), None);
        assert_eq!(cat.template("t3").unwrap().default_cost, Decimal::from(85000));
        assert_eq!(
            cat.template("t9").unwrap_err(),
            CoreError::TemplateNotFound("t9".into())
        );
    }

    #[test]
    fn instantiate_copies_template_with_undecided_date_and_venue() {
        let cat = default_catalog();
        let ev = cat.template("t2").unwrap().instantiate();
        assert!(ev.id.starts_with("evt_"));
        assert_eq!(ev.name, "Sangeet");
        assert_eq!(ev.team.len(), 3);
        assert_eq!(ev.approx_cost, Decimal::from(40000));
        assert!(!ev.is_date_decided);
        assert!(!ev.is_venue_decided);
    }

    #[test]
    fn apply_client_master_links_id() {
        let cat = default_catalog();
        let mut details = ClientDetails::default();
        cat.client("c2").unwrap().apply_to(&mut details);
        assert_eq!(details.id.as_deref(), Some("c2"));
        assert_eq!(details.company, "Tech Solutions Pvt Ltd");
    }

    #[test]
    fn ensure_skill_reuses_by_name() {
        let mut cat = default_catalog();
        let id = cat.ensure_skill("drone pilot").id.clone();
        assert_eq!(id, "s4");
        let new_id = cat.ensure_skill("Makeup Artist").id.clone();
        assert!(new_id.starts_with("skl_"));
        assert_eq!(cat.skills.len(), 8);
    }

    #[test]
    fn catalog_yaml_roundtrip() {
        let cat = default_catalog();
        let yaml = serde_yaml::to_string(&cat).unwrap();
        let back: Catalog = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, cat);
    }

    #[test]
    fn find_skill_by_id_or_name() {
        let cat = default_catalog();
        assert_eq!(cat.find_skill("s3").unwrap().name, "Cinematographer");
        assert_eq!(cat.find_skill(" candid photographer ").unwrap().id, "s1");
        assert_eq!(
            cat.find_skill("Makeup Artist").unwrap_err(),
            CoreError::SkillNotFound("Makeup Artist".into())
        );
    }

    #[test]
    fn skill_or_register_creates_missing_names_only() {
        let mut cat = default_catalog();
        assert_eq!(cat.skill_or_register("s2").unwrap().id, "s2");
        assert_eq!(cat.skill_or_register("Assistant").unwrap().id, "s7");
        let id = cat.skill_or_register("Makeup Artist").unwrap().id.clone();
        assert!(id.starts_with("skl_"));
        assert_eq!(cat.skills.len(), 8);
        assert!(cat.skill_or_register("   ").is_err());
        assert_eq!(cat.skills.len(), 8);
    }

    #[test]
    fn client_add_edit_remove() {
        let mut cat = default_catalog();
        let id = cat.add_client(ClientMaster {
            id: String::new(),
            name: "Karan & Meera".into(),
            company: String::new(),
            phone: "+91-9000000000".into(),
            email: String::new(),
            address: String::new(),
            notes: None,
        });
        assert!(id.starts_with("cli_"));
        cat.client_mut(&id).unwrap().email = "km@example.com".into();
        assert_eq!(cat.client(&id).unwrap().email, "km@example.com");
        let removed = cat.remove_client(&id).unwrap();
        assert_eq!(removed.name, "Karan & Meera");
        assert_eq!(
            cat.remove_client(&id).unwrap_err(),
            CoreError::ClientNotFound(id.clone())
        );
        assert_eq!(cat.clients.len(), 2);
    }

    #[test]
    fn template_add_clamps_cost_and_remove() {
        let mut cat = default_catalog();
        let id = cat.add_template(EventTemplate {
            id: String::new(),
            name: "Mehendi".into(),
            default_duration: "3–4 Hours".into(),
            default_team: team(&[("s1", 1)]),
            default_cost: Decimal::from(-10),
            description: None,
        });
        assert!(id.starts_with("tpl_"));
        assert_eq!(cat.template(&id).unwrap().default_cost, Decimal::ZERO);
        assert_eq!(cat.remove_template("t1").unwrap().name, "Haldi Ceremony");
        assert_eq!(cat.templates.len(), 4);
        assert!(cat.remove_template("t1").is_err());
    }
}
