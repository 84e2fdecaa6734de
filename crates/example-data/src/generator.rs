//! Deterministic firm generation from a seed definition.

use std::collections::HashSet;

use fake::Fake;
use fake::faker::company::en::CompanyName;
use fake::faker::name::en::Name;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Builder;

use crate::error::GenerationError;
use crate::firm::{DemoClientAccount, DemoFirm, DemoRole, DemoUser};
use crate::registry::SeedDefinition;

/// Upper bound on generated professionals and clients.
const MAX_COUNT: u32 = 500;

/// Generate a reproducible demo firm from a seed definition.
///
/// Equal definitions produce byte-identical firms; every run with the same
/// seed yields the same ids, emails and passwords, so seeded environments
/// can be logged into with known credentials.
pub fn generate_demo_firm(definition: &SeedDefinition) -> Result<DemoFirm, GenerationError> {
    check_count("professionalCount", definition.professional_count)?;
    check_count("clientCount", definition.client_count)?;

    let mut rng = ChaCha8Rng::seed_from_u64(definition.seed);
    let mut taken_emails = HashSet::new();

    let admin = demo_user(
        &mut rng,
        &mut taken_emails,
        DemoRole::Admin,
        "firm.example",
    );
    let professionals: Vec<DemoUser> = (0..definition.professional_count)
        .map(|_| demo_user(&mut rng, &mut taken_emails, DemoRole::Professional, "firm.example"))
        .collect();

    let clients = (0..definition.client_count)
        .map(|_| demo_client(&mut rng, &mut taken_emails, professionals.len()))
        .collect();

    Ok(DemoFirm {
        admin,
        professionals,
        clients,
    })
}

fn check_count(field: &'static str, value: u32) -> Result<(), GenerationError> {
    if value == 0 || value > MAX_COUNT {
        return Err(GenerationError::CountOutOfRange {
            field,
            value,
            max: MAX_COUNT,
        });
    }
    Ok(())
}

fn demo_user(
    rng: &mut ChaCha8Rng,
    taken: &mut HashSet<String>,
    role: DemoRole,
    domain: &str,
) -> DemoUser {
    let name: String = Name().fake_with_rng(rng);
    let email = unique_email(taken, &name, domain);
    DemoUser {
        identity_id: deterministic_uuid(rng),
        email,
        name,
        role,
        password: format!("demo-{:08x}", rng.random::<u32>()),
    }
}

fn demo_client(
    rng: &mut ChaCha8Rng,
    taken: &mut HashSet<String>,
    professional_count: usize,
) -> DemoClientAccount {
    let company: String = CompanyName().fake_with_rng(rng);
    let contact_email = unique_email(taken, &company, "mail.example");

    // Roughly half the accounts get a portal login.
    let linked_user = if rng.random::<bool>() {
        Some(demo_user(rng, taken, DemoRole::Client, "mail.example"))
    } else {
        None
    };

    let mut assigned_professionals = Vec::new();
    if professional_count > 0 {
        let first = rng.random_range(0..professional_count);
        assigned_professionals.push(first);
        if professional_count > 1 && rng.random::<bool>() {
            let second = (first + 1) % professional_count;
            assigned_professionals.push(second);
        }
    }

    DemoClientAccount {
        id: deterministic_uuid(rng),
        name: company,
        contact_email,
        linked_user,
        assigned_professionals,
    }
}

fn deterministic_uuid(rng: &mut ChaCha8Rng) -> String {
    Builder::from_random_bytes(rng.random::<[u8; 16]>())
        .into_uuid()
        .to_string()
}

fn unique_email(taken: &mut HashSet<String>, display: &str, domain: &str) -> String {
    let slug: String = display
        .to_ascii_lowercase()
        .chars()
        .filter_map(|ch| {
            if ch.is_ascii_alphanumeric() {
                Some(ch)
            } else if ch.is_whitespace() || ch == '-' || ch == '.' {
                Some('.')
            } else {
                None
            }
        })
        .collect();
    let slug = slug.trim_matches('.').replace("..", ".");

    let mut candidate = format!("{slug}@{domain}");
    let mut suffix = 1_u32;
    while !taken.insert(candidate.clone()) {
        suffix += 1;
        candidate = format!("{slug}{suffix}@{domain}");
    }
    candidate
}
