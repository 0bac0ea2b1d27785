use clap::Subcommand;
use quote_core::catalog::{ClientMaster, EventTemplate};
use quote_core::money::coerce_price;
use quote_core::TeamMember;
use quote_render::format_inr;
use quote_store::Workspace;
use std::path::Path;

use crate::cmd_quote::open_locked;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum CatalogCmd {
    /// List skills, clients, and event templates
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Register a skill (no-op if one with the same name exists)
    AddSkill {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Save a repeat client
    AddClient {
        name: String,
        #[command(flatten)]
        contact: ClientArgs,
    },
    /// Update fields of a saved client
    EditClient {
        client_id: String,
        /// New display name
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        contact: ClientArgs,
    },
    /// Remove a saved client
    RemoveClient { client_id: String },
    /// Save an event template
    AddTemplate {
        name: String,
        /// Coverage duration (e.g. "4–5 Hours")
        #[arg(long, default_value = "")]
        duration: String,
        /// Default cost; non-numeric input counts as 0
        #[arg(long, default_value = "0")]
        cost: String,
        /// Team member as skill=count; the skill is an id or a name
        #[arg(long = "team")]
        team: Vec<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Remove an event template
    RemoveTemplate { template_id: String },
}

#[derive(clap::Args, Default)]
pub struct ClientArgs {
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

// ── Dispatch ──

pub fn run(cmd: CatalogCmd, repo_root: &Path) -> anyhow::Result<()> {
    match cmd {
        CatalogCmd::List { json } => list(repo_root, json),
        CatalogCmd::AddSkill { name, description } => {
            add_skill(repo_root, &name, description.as_deref()).map(|_| ())
        }
        CatalogCmd::AddClient { name, contact } => add_client(repo_root, &name, contact).map(|_| ()),
        CatalogCmd::EditClient {
            client_id,
            name,
            contact,
        } => edit_client(repo_root, &client_id, name, contact),
        CatalogCmd::RemoveClient { client_id } => remove_client(repo_root, &client_id),
        CatalogCmd::AddTemplate {
            name,
            duration,
            cost,
            team,
            description,
        } => add_template(repo_root, &name, &duration, &cost, &team, description).map(|_| ()),
        CatalogCmd::RemoveTemplate { template_id } => remove_template(repo_root, &template_id),
    }
}

// ── Command Implementations ──

pub fn list(repo_root: &Path, json: bool) -> anyhow::Result<()> {
    let ws = Workspace::open(repo_root)?;
    let catalog = &ws.catalog;
    if json {
        println!("{}", serde_json::to_string_pretty(catalog)?);
        return Ok(());
    }

    println!("Skills");
    for s in &catalog.skills {
        println!("  {:<8} {}", s.id, s.name);
    }
    println!("\nClients");
    for c in &catalog.clients {
        println!("  {:<8} {}  {}", c.id, c.name, c.phone);
    }
    println!("\nEvent templates");
    for t in &catalog.templates {
        let team: Vec<String> = t
            .default_team
            .iter()
            .map(|m| {
                let name = catalog.skill_name(&m.skill_id).unwrap_or("Unknown Skill");
                format!("{} {name}", m.count)
            })
            .collect();
        println!(
            "  {:<8} {} ({}) {}  [{}]",
            t.id,
            t.name,
            t.default_duration,
            format_inr(t.default_cost),
            team.join(", ")
        );
    }
    Ok(())
}

/// Returns the id of the (new or existing) skill.
pub fn add_skill(repo_root: &Path, name: &str, description: Option<&str>) -> anyhow::Result<String> {
    if name.trim().is_empty() {
        anyhow::bail!("skill name must not be empty");
    }
    let (mut ws, _lock) = open_locked(repo_root)?;
    let before = ws.catalog.skills.len();
    let id = ws.catalog.ensure_skill(name).id.clone();
    if ws.catalog.skills.len() == before {
        println!("Skill already exists: {id}");
        return Ok(id);
    }
    if let Some(desc) = description {
        if let Some(skill) = ws.catalog.skills.last_mut() {
            skill.description = Some(desc.to_string());
        }
    }
    ws.save_catalog()?;
    tracing::info!(skill = %id, name, "skill added to catalog");
    println!("Added skill {name} ({id})");
    Ok(id)
}

/// Returns the id of the new client.
pub fn add_client(repo_root: &Path, name: &str, contact: ClientArgs) -> anyhow::Result<String> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("client name must not be empty");
    }
    let (mut ws, _lock) = open_locked(repo_root)?;
    let id = ws.catalog.add_client(ClientMaster {
        id: String::new(),
        name: name.to_string(),
        company: contact.company.unwrap_or_default(),
        phone: contact.phone.unwrap_or_default(),
        email: contact.email.unwrap_or_default(),
        address: contact.address.unwrap_or_default(),
        notes: contact.notes,
    });
    ws.save_catalog()?;
    tracing::info!(client = %id, name, "client added to catalog");
    println!("Added client {name} ({id})");
    Ok(id)
}

pub fn edit_client(
    repo_root: &Path,
    client_id: &str,
    name: Option<String>,
    contact: ClientArgs,
) -> anyhow::Result<()> {
    let (mut ws, _lock) = open_locked(repo_root)?;
    let client = ws.catalog.client_mut(client_id)?;
    if let Some(name) = name {
        let name = name.trim();
        if name.is_empty() {
            anyhow::bail!("client name must not be empty");
        }
        client.name = name.to_string();
    }
    let ClientArgs {
        company,
        phone,
        email,
        address,
        notes,
    } = contact;
    for (field, value) in [
        (&mut client.company, company),
        (&mut client.phone, phone),
        (&mut client.email, email),
        (&mut client.address, address),
    ] {
        if let Some(value) = value {
            *field = value;
        }
    }
    if let Some(notes) = notes {
        client.notes = (!notes.is_empty()).then_some(notes);
    }
    let name = client.name.clone();
    ws.save_catalog()?;
    tracing::info!(client = client_id, "client updated");
    println!("Updated client {name} ({client_id})");
    Ok(())
}

pub fn remove_client(repo_root: &Path, client_id: &str) -> anyhow::Result<()> {
    let (mut ws, _lock) = open_locked(repo_root)?;
    let removed = ws.catalog.remove_client(client_id)?;
    ws.save_catalog()?;
    tracing::info!(client = client_id, "client removed from catalog");
    println!("Removed client {} ({client_id})", removed.name);
    Ok(())
}

/// Parse `skill=count`, splitting at the last `=` so names may contain one.
fn parse_team_entry(entry: &str) -> anyhow::Result<(&str, u32)> {
    let (skill, count) = entry
        .rsplit_once('=')
        .ok_or_else(|| anyhow::anyhow!("team entry must look like skill=count, got {entry:?}"))?;
    let count: u32 = count
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid headcount in team entry {entry:?}"))?;
    Ok((skill.trim(), count))
}

/// Returns the id of the new template. Unknown skill names in `team` are
/// registered in the catalog.
pub fn add_template(
    repo_root: &Path,
    name: &str,
    duration: &str,
    cost: &str,
    team: &[String],
    description: Option<String>,
) -> anyhow::Result<String> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("template name must not be empty");
    }
    let entries = team
        .iter()
        .map(|e| parse_team_entry(e))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let (mut ws, _lock) = open_locked(repo_root)?;
    let mut default_team: Vec<TeamMember> = Vec::new();
    for (skill, count) in entries {
        if count == 0 {
            continue;
        }
        let skill_id = ws.catalog.skill_or_register(skill)?.id.clone();
        default_team.retain(|m| m.skill_id != skill_id);
        default_team.push(TeamMember { skill_id, count });
    }
    let id = ws.catalog.add_template(EventTemplate {
        id: String::new(),
        name: name.to_string(),
        default_duration: duration.trim().to_string(),
        default_team,
        default_cost: coerce_price(cost),
        description,
    });
    ws.save_catalog()?;
    tracing::info!(template = %id, name, "template added to catalog");
    println!("Added template {name} ({id})");
    Ok(id)
}

pub fn remove_template(repo_root: &Path, template_id: &str) -> anyhow::Result<()> {
    let (mut ws, _lock) = open_locked(repo_root)?;
    let removed = ws.catalog.remove_template(template_id)?;
    ws.save_catalog()?;
    tracing::info!(template = template_id, "template removed from catalog");
    println!("Removed template {} ({template_id})", removed.name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_skill_persists_and_dedupes() {
        let tmp = tempfile::tempdir().unwrap();
        crate::cmd_init::execute(tmp.path()).unwrap();

        let id = add_skill(tmp.path(), "Makeup Artist", Some("Bridal makeup")).unwrap();
        assert!(id.starts_with("skl_"));
        let again = add_skill(tmp.path(), "makeup artist", None).unwrap();
        assert_eq!(again, id);

        let ws = Workspace::open(tmp.path()).unwrap();
        let skill = ws.catalog.skill(&id).unwrap();
        assert_eq!(skill.description.as_deref(), Some("Bridal makeup"));
        assert_eq!(ws.catalog.skills.len(), 8);
    }

    #[test]
    fn existing_seed_skill_is_reused() {
        let tmp = tempfile::tempdir().unwrap();
        crate::cmd_init::execute(tmp.path()).unwrap();
        assert_eq!(add_skill(tmp.path(), "Drone Pilot", None).unwrap(), "s4");
        assert!(add_skill(tmp.path(), "  ", None).is_err());
    }

    #[test]
    fn client_add_edit_remove() {
        let tmp = tempfile::tempdir().unwrap();
        crate::cmd_init::execute(tmp.path()).unwrap();

        let contact = ClientArgs {
            phone: Some("+91-9000000001".into()),
            notes: Some("Walk-in".into()),
            ..Default::default()
        };
        let id = add_client(tmp.path(), " Karan & Isha ", contact).unwrap();
        assert!(id.starts_with("cli_"));

        let update = ClientArgs {
            email: Some("karan.isha@example.com".into()),
            notes: Some(String::new()),
            ..Default::default()
        };
        edit_client(tmp.path(), &id, None, update).unwrap();
        let ws = Workspace::open(tmp.path()).unwrap();
        let client = ws.catalog.client(&id).unwrap();
        assert_eq!(client.name, "Karan & Isha");
        assert_eq!(client.phone, "+91-9000000001");
        assert_eq!(client.email, "karan.isha@example.com");
        assert_eq!(client.notes, None);
        assert_eq!(ws.catalog.clients.len(), 3);

        remove_client(tmp.path(), &id).unwrap();
        assert!(remove_client(tmp.path(), &id).is_err());
        let ws = Workspace::open(tmp.path()).unwrap();
        assert_eq!(ws.catalog.clients.len(), 2);
    }

    #[test]
    fn client_requires_name_and_known_id() {
        let tmp = tempfile::tempdir().unwrap();
        crate::cmd_init::execute(tmp.path()).unwrap();
        assert!(add_client(tmp.path(), "  ", ClientArgs::default()).is_err());
        assert!(edit_client(tmp.path(), "c99", None, ClientArgs::default()).is_err());
        assert!(edit_client(tmp.path(), "c1", Some(" ".into()), ClientArgs::default()).is_err());
        let ws = Workspace::open(tmp.path()).unwrap();
        assert_eq!(ws.catalog.client("c1").unwrap().name, "Rahul Sharma & Priya Verma");
    }

    #[test]
    fn template_add_resolves_team_and_remove() {
        let tmp = tempfile::tempdir().unwrap();
        crate::cmd_init::execute(tmp.path()).unwrap();

        let team = vec!["s1=2".to_string(), "Makeup Artist=1".to_string()];
        let id = add_template(
            tmp.path(),
            "Mehendi",
            "3 Hours",
            "18000",
            &team,
            Some("Afternoon function".into()),
        )
        .unwrap();
        assert!(id.starts_with("tpl_"));

        let ws = Workspace::open(tmp.path()).unwrap();
        let tpl = ws.catalog.template(&id).unwrap();
        let makeup = ws.catalog.find_skill("Makeup Artist").unwrap();
        assert_eq!(tpl.default_cost, rust_decimal::Decimal::from(18000));
        assert_eq!(tpl.default_duration, "3 Hours");
        assert_eq!(tpl.default_team.len(), 2);
        assert_eq!(tpl.default_team[0].skill_id, "s1");
        assert_eq!(tpl.default_team[0].count, 2);
        assert_eq!(tpl.default_team[1].skill_id, makeup.id);

        remove_template(tmp.path(), &id).unwrap();
        assert!(remove_template(tmp.path(), &id).is_err());
        let ws = Workspace::open(tmp.path()).unwrap();
        assert_eq!(ws.catalog.templates.len(), 4);
    }

    #[test]
    fn template_cost_is_lenient_and_bad_team_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        crate::cmd_init::execute(tmp.path()).unwrap();

        let id = add_template(tmp.path(), "Pre-wedding", "", "-500", &[], None).unwrap();
        let ws = Workspace::open(tmp.path()).unwrap();
        assert!(ws.catalog.template(&id).unwrap().default_cost.is_zero());

        let bad = vec!["s1".to_string()];
        assert!(add_template(tmp.path(), "Roka", "", "0", &bad, None).is_err());
        let bad = vec!["s1=two".to_string()];
        assert!(add_template(tmp.path(), "Roka", "", "0", &bad, None).is_err());
        let ws = Workspace::open(tmp.path()).unwrap();
        assert_eq!(ws.catalog.templates.len(), 5);
    }
}
