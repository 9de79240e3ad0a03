use prm_contacts::db::*;
use prm_contacts::model::*;
use prm_contacts::ops::*;
use prm_contacts::queries::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rusqlite::Connection;

fn setup() -> (Connection, Account, StdRng) {
    let conn = schema::test_connection();
    let account = Account::create("Regis".into(), "regis@example.com".into());
    account_repo::insert(&conn, &account).unwrap();
    (conn, account, StdRng::seed_from_u64(42))
}

fn add(conn: &Connection, account: &Account, rng: &mut StdRng, first: &str, last: &str) -> Contact {
    contact_ops::add_contact(conn, account.id, first, Some(last), false, rng).unwrap()
}

fn add_partial(conn: &Connection, account: &Account, rng: &mut StdRng, first: &str) -> Contact {
    contact_ops::add_contact(conn, account.id, first, None, true, rng).unwrap()
}

fn ids(contacts: &[Contact]) -> Vec<Id<Contact>> {
    contacts.iter().map(|c| c.id).collect()
}

// ==========================================================================
// PARTNERS
// ==========================================================================

#[test]
fn bilateral_partners_see_each_other() {
    let (conn, account, mut rng) = setup();
    let a = add(&conn, &account, &mut rng, "Alice", "Anders");
    let b = add(&conn, &account, &mut rng, "Bob", "Berg");

    let edges = family_ops::set_relationship_with(&conn, a.id, b.id, true).unwrap();
    assert_eq!(edges.len(), 2);

    assert_eq!(ids(&family_queries::current_partners(&conn, a.id).unwrap()), vec![b.id]);
    assert_eq!(ids(&family_queries::current_partners(&conn, b.id).unwrap()), vec![a.id]);
}

#[test]
fn one_way_link_is_only_visible_from_the_source() {
    let (conn, account, mut rng) = setup();
    let a = add(&conn, &account, &mut rng, "Alice", "Anders");
    let b = add(&conn, &account, &mut rng, "Bob", "Berg");

    family_ops::set_relationship_with(&conn, a.id, b.id, false).unwrap();

    assert_eq!(ids(&family_queries::current_partners(&conn, a.id).unwrap()), vec![b.id]);
    assert!(family_queries::current_partners(&conn, b.id).unwrap().is_empty());
}

#[test]
fn non_bilateral_unlink_leaves_reverse_edge() {
    let (conn, account, mut rng) = setup();
    let a = add(&conn, &account, &mut rng, "Alice", "Anders");
    let b = add(&conn, &account, &mut rng, "Bob", "Berg");

    family_ops::set_relationship_with(&conn, a.id, b.id, true).unwrap();
    family_ops::unset_relationship_with(&conn, a.id, b.id, false).unwrap();

    assert!(family_queries::current_partners(&conn, a.id).unwrap().is_empty());
    assert_eq!(ids(&family_queries::current_partners(&conn, b.id).unwrap()), vec![a.id]);
}

#[test]
fn bilateral_unlink_removes_both_directions() {
    let (conn, account, mut rng) = setup();
    let a = add(&conn, &account, &mut rng, "Alice", "Anders");
    let b = add(&conn, &account, &mut rng, "Bob", "Berg");

    family_ops::set_relationship_with(&conn, a.id, b.id, true).unwrap();
    family_ops::unset_relationship_with(&conn, b.id, a.id, true).unwrap();

    assert!(family_queries::current_partners(&conn, a.id).unwrap().is_empty());
    assert!(family_queries::current_partners(&conn, b.id).unwrap().is_empty());
}

#[test]
fn unlinking_missing_edge_is_not_found() {
    let (conn, account, mut rng) = setup();
    let a = add(&conn, &account, &mut rng, "Alice", "Anders");
    let b = add(&conn, &account, &mut rng, "Bob", "Berg");

    let err = family_ops::unset_relationship_with(&conn, a.id, b.id, false).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn bilateral_unlink_of_one_way_edge_applies_first_half() {
    let (conn, account, mut rng) = setup();
    let a = add(&conn, &account, &mut rng, "Alice", "Anders");
    let b = add(&conn, &account, &mut rng, "Bob", "Berg");

    family_ops::set_relationship_with(&conn, a.id, b.id, false).unwrap();
    let err = family_ops::unset_relationship_with(&conn, a.id, b.id, true).unwrap_err();
    assert!(err.is_not_found());

    // The a -> b edge was already removed before the reverse lookup failed.
    assert!(family_queries::current_partners(&conn, a.id).unwrap().is_empty());
}

#[test]
fn linking_twice_stores_duplicate_edges() {
    let (conn, account, mut rng) = setup();
    let a = add(&conn, &account, &mut rng, "Alice", "Anders");
    let b = add(&conn, &account, &mut rng, "Bob", "Berg");

    family_ops::set_relationship_with(&conn, a.id, b.id, false).unwrap();
    family_ops::set_relationship_with(&conn, a.id, b.id, false).unwrap();
    assert_eq!(ids(&family_queries::current_partners(&conn, a.id).unwrap()), vec![b.id, b.id]);

    // Unlink removes one at a time.
    family_ops::unset_relationship_with(&conn, a.id, b.id, false).unwrap();
    assert_eq!(ids(&family_queries::current_partners(&conn, a.id).unwrap()), vec![b.id]);
}

#[test]
fn partners_come_back_in_link_order() {
    let (conn, account, mut rng) = setup();
    let a = add(&conn, &account, &mut rng, "Alice", "Anders");
    let z = add(&conn, &account, &mut rng, "Zoe", "Zimmer");
    let b = add(&conn, &account, &mut rng, "Bob", "Berg");

    family_ops::set_relationship_with(&conn, a.id, z.id, false).unwrap();
    family_ops::set_relationship_with(&conn, a.id, b.id, false).unwrap();

    assert_eq!(ids(&family_queries::current_partners(&conn, a.id).unwrap()), vec![z.id, b.id]);
}

#[test]
fn inactive_relationship_is_not_a_current_partner() {
    let (conn, account, mut rng) = setup();
    let a = add(&conn, &account, &mut rng, "Alice", "Anders");
    let b = add(&conn, &account, &mut rng, "Bob", "Berg");

    family_ops::set_relationship_with(&conn, a.id, b.id, false).unwrap();
    let edge = family_ops::set_relationship_active(&conn, a.id, b.id, false).unwrap();
    assert!(!edge.is_active);

    assert!(family_queries::current_partners(&conn, a.id).unwrap().is_empty());
    // Still linked, so still not a candidate.
    assert!(family_queries::potential_contacts(&conn, a.id).unwrap().is_empty());
}

#[test]
fn linking_across_accounts_is_rejected() {
    let (conn, account, mut rng) = setup();
    let other = Account::create("Other".into(), "other@example.com".into());
    account_repo::insert(&conn, &other).unwrap();

    let a = add(&conn, &account, &mut rng, "Alice", "Anders");
    let x = add(&conn, &other, &mut rng, "Xavier", "Xu");

    let err = family_ops::set_relationship_with(&conn, a.id, x.id, true).unwrap_err();
    assert!(matches!(err, prm_contacts::error::PrmError::CrossAccount { .. }));
    let err = family_ops::is_the_offspring_of(&conn, a.id, x.id, true).unwrap_err();
    assert!(matches!(err, prm_contacts::error::PrmError::CrossAccount { .. }));
}

#[test]
fn linking_unknown_contact_is_not_found() {
    let (conn, account, mut rng) = setup();
    let a = add(&conn, &account, &mut rng, "Alice", "Anders");

    let err = family_ops::set_relationship_with(&conn, a.id, Id::generate(), false).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn first_partner_resolves_the_source_of_an_incoming_edge() {
    let (conn, account, mut rng) = setup();
    let a = add(&conn, &account, &mut rng, "Alice", "Anders");
    let p = add_partial(&conn, &account, &mut rng, "Pat");

    family_ops::set_relationship_with(&conn, a.id, p.id, false).unwrap();

    assert_eq!(family_queries::first_partner(&conn, p.id).unwrap().id, a.id);
    assert!(family_queries::first_partner(&conn, a.id).unwrap_err().is_not_found());
}

// ==========================================================================
// OFFSPRINGS & PROGENITORS
// ==========================================================================

#[test]
fn bilateral_offspring_link_is_visible_from_both_sides() {
    let (conn, account, mut rng) = setup();
    let p = add(&conn, &account, &mut rng, "Paula", "Parent");
    let c = add(&conn, &account, &mut rng, "Carl", "Parent");

    let (_, progenitor) = family_ops::is_the_offspring_of(&conn, c.id, p.id, true).unwrap();
    assert!(progenitor.is_some());

    assert_eq!(ids(&family_queries::offsprings(&conn, p.id).unwrap()), vec![c.id]);
    assert_eq!(ids(&family_queries::progenitors(&conn, c.id).unwrap()), vec![p.id]);
}

#[test]
fn one_way_offspring_link_has_no_progenitor() {
    let (conn, account, mut rng) = setup();
    let p = add(&conn, &account, &mut rng, "Paula", "Parent");
    let c = add(&conn, &account, &mut rng, "Carl", "Parent");

    let (_, progenitor) = family_ops::is_the_offspring_of(&conn, c.id, p.id, false).unwrap();
    assert!(progenitor.is_none());

    assert_eq!(ids(&family_queries::offsprings(&conn, p.id).unwrap()), vec![c.id]);
    assert!(family_queries::progenitors(&conn, c.id).unwrap().is_empty());
}

#[test]
fn unset_offspring_non_bilateral_keeps_progenitor() {
    let (conn, account, mut rng) = setup();
    let p = add(&conn, &account, &mut rng, "Paula", "Parent");
    let c = add(&conn, &account, &mut rng, "Carl", "Parent");

    family_ops::is_the_offspring_of(&conn, c.id, p.id, true).unwrap();
    family_ops::unset_offspring(&conn, p.id, c.id, false).unwrap();

    assert!(family_queries::offsprings(&conn, p.id).unwrap().is_empty());
    assert_eq!(ids(&family_queries::progenitors(&conn, c.id).unwrap()), vec![p.id]);
}

#[test]
fn unset_offspring_bilateral_removes_pair() {
    let (conn, account, mut rng) = setup();
    let p = add(&conn, &account, &mut rng, "Paula", "Parent");
    let c = add(&conn, &account, &mut rng, "Carl", "Parent");

    family_ops::is_the_offspring_of(&conn, c.id, p.id, true).unwrap();
    family_ops::unset_offspring(&conn, p.id, c.id, true).unwrap();

    assert!(family_queries::offsprings(&conn, p.id).unwrap().is_empty());
    assert!(family_queries::progenitors(&conn, c.id).unwrap().is_empty());
}

#[test]
fn unset_missing_offspring_is_not_found() {
    let (conn, account, mut rng) = setup();
    let p = add(&conn, &account, &mut rng, "Paula", "Parent");
    let c = add(&conn, &account, &mut rng, "Carl", "Parent");

    let err = family_ops::unset_offspring(&conn, p.id, c.id, false).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn first_progenitor_of_partial_child() {
    let (conn, account, mut rng) = setup();
    let p = add(&conn, &account, &mut rng, "Paula", "Parent");
    let c = add_partial(&conn, &account, &mut rng, "Kid");

    assert!(family_queries::first_progenitor(&conn, c.id).unwrap_err().is_not_found());

    family_ops::is_the_offspring_of(&conn, c.id, p.id, false).unwrap();
    assert_eq!(family_queries::first_progenitor(&conn, c.id).unwrap().id, p.id);
}

// ==========================================================================
// POTENTIAL CONTACTS
// ==========================================================================

#[test]
fn potential_contacts_excludes_self_and_partials_sorted_by_name() {
    let (conn, account, mut rng) = setup();
    let a = add(&conn, &account, &mut rng, "Alice", "Anders");
    let d = add(&conn, &account, &mut rng, "Dora", "Diaz");
    let b2 = add(&conn, &account, &mut rng, "Bob", "Zed");
    let b1 = add(&conn, &account, &mut rng, "Bob", "Adams");
    add_partial(&conn, &account, &mut rng, "Cleo");

    let potential = family_queries::potential_contacts(&conn, a.id).unwrap();
    assert_eq!(ids(&potential), vec![b1.id, b2.id, d.id]);
}

#[test]
fn potential_contacts_excludes_source_side_links_only() {
    let (conn, account, mut rng) = setup();
    let a = add(&conn, &account, &mut rng, "Alice", "Anders");
    let b = add(&conn, &account, &mut rng, "Bob", "Berg");
    let d = add(&conn, &account, &mut rng, "Dora", "Diaz");
    let e = add(&conn, &account, &mut rng, "Emil", "Eck");
    let f = add(&conn, &account, &mut rng, "Fay", "Fox");

    // a is the source row of each of these.
    family_ops::set_relationship_with(&conn, a.id, b.id, false).unwrap();
    family_ops::is_the_offspring_of(&conn, a.id, d.id, false).unwrap();
    family_ops::is_the_offspring_of(&conn, e.id, a.id, true).unwrap();

    let potential = family_queries::potential_contacts(&conn, a.id).unwrap();
    assert_eq!(ids(&potential), vec![f.id]);

    // b has no outgoing edge, so a is still a candidate for b.
    let for_b = family_queries::potential_contacts(&conn, b.id).unwrap();
    assert!(for_b.iter().any(|c| c.id == a.id));
}

#[test]
fn potential_contacts_stay_within_account() {
    let (conn, account, mut rng) = setup();
    let other = Account::create("Other".into(), "other@example.com".into());
    account_repo::insert(&conn, &other).unwrap();

    let a = add(&conn, &account, &mut rng, "Alice", "Anders");
    add(&conn, &other, &mut rng, "Xavier", "Xu");

    assert!(family_queries::potential_contacts(&conn, a.id).unwrap().is_empty());
}

// ==========================================================================
// FAMILY SCENARIO
// ==========================================================================

#[test]
fn family_scenario_with_partial_child() {
    let (conn, account, mut rng) = setup();
    let a = add(&conn, &account, &mut rng, "Alice", "Anders");
    let b = add(&conn, &account, &mut rng, "Bob", "Berg");
    let c = add_partial(&conn, &account, &mut rng, "Cleo");

    family_ops::set_relationship_with(&conn, a.id, b.id, true).unwrap();
    assert_eq!(ids(&family_queries::current_partners(&conn, a.id).unwrap()), vec![b.id]);
    assert_eq!(ids(&family_queries::current_partners(&conn, b.id).unwrap()), vec![a.id]);

    family_ops::is_the_offspring_of(&conn, c.id, a.id, true).unwrap();
    assert_eq!(ids(&family_queries::offsprings(&conn, a.id).unwrap()), vec![c.id]);
    assert_eq!(ids(&family_queries::progenitors(&conn, c.id).unwrap()), vec![a.id]);
    assert_eq!(ids(&family_queries::partial_offsprings(&conn, a.id).unwrap()), vec![c.id]);
    assert!(family_queries::partial_partners(&conn, a.id).unwrap().is_empty());

    assert_eq!(ids(&family_queries::family_members(&conn, a.id).unwrap()), vec![b.id, c.id]);
}

#[test]
fn family_members_skip_parents_known_only_as_progenitors() {
    let (conn, account, mut rng) = setup();
    let a = add(&conn, &account, &mut rng, "Alice", "Anders");
    let g = add(&conn, &account, &mut rng, "Greta", "Anders");

    // g is a's parent; a sees g only through the "parent of" edge.
    family_ops::is_the_offspring_of(&conn, a.id, g.id, true).unwrap();
    assert_eq!(ids(&family_queries::progenitors(&conn, a.id).unwrap()), vec![g.id]);

    assert!(family_queries::family_members(&conn, a.id).unwrap().is_empty());
}

#[test]
fn reminders_about_relatives_covers_partial_relatives_only() {
    let (conn, account, mut rng) = setup();
    let a = add(&conn, &account, &mut rng, "Alice", "Anders");
    let b = add(&conn, &account, &mut rng, "Bob", "Berg");
    let p = add_partial(&conn, &account, &mut rng, "Pat");
    let c = add_partial(&conn, &account, &mut rng, "Cleo");
    let date = chrono::NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();

    family_ops::set_relationship_with(&conn, a.id, b.id, false).unwrap();
    family_ops::set_relationship_with(&conn, a.id, p.id, false).unwrap();
    family_ops::is_the_offspring_of(&conn, c.id, a.id, false).unwrap();

    record_ops::add_reminder(&conn, a.id, "Alice's checkup", date, Frequency::OneTime).unwrap();
    record_ops::add_reminder(&conn, b.id, "Bob's birthday", date, Frequency::Year(1)).unwrap();
    record_ops::add_reminder(&conn, p.id, "Pat's recital", date, Frequency::OneTime).unwrap();
    record_ops::add_reminder(&conn, c.id, "Cleo's school", date, Frequency::Week(1)).unwrap();

    let titles: Vec<String> = family_queries::reminders_about_relatives(&conn, a.id)
        .unwrap()
        .into_iter()
        .map(|r| r.title)
        .collect();
    assert_eq!(titles, vec!["Alice's checkup", "Pat's recital", "Cleo's school"]);
}

#[test]
fn dangling_edge_target_fails_the_query() {
    let (conn, account, mut rng) = setup();
    let a = add(&conn, &account, &mut rng, "Alice", "Anders");
    let b = add(&conn, &account, &mut rng, "Bob", "Berg");
    family_ops::set_relationship_with(&conn, a.id, b.id, false).unwrap();

    conn.execute_batch("PRAGMA foreign_keys = OFF;").unwrap();
    conn.execute("DELETE FROM contacts WHERE id = ?1", [b.id.to_db()]).unwrap();

    let err = family_queries::current_partners(&conn, a.id).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn deleting_a_contact_drops_its_edges() {
    let (conn, account, mut rng) = setup();
    let a = add(&conn, &account, &mut rng, "Alice", "Anders");
    let b = add(&conn, &account, &mut rng, "Bob", "Berg");
    family_ops::set_relationship_with(&conn, a.id, b.id, true).unwrap();

    contact_ops::delete_contact(&conn, b.id).unwrap();
    assert!(family_queries::current_partners(&conn, a.id).unwrap().is_empty());
}

// ==========================================================================
// PROJECTIONS & EVENTS
// ==========================================================================

#[test]
fn short_projection_uses_settings() {
    let (conn, account, mut rng) = setup();
    let a = add(&conn, &account, &mut rng, "Alice", "Anders");
    let b = add(&conn, &account, &mut rng, "Bob", "Berg");
    family_ops::set_relationship_with(&conn, a.id, b.id, false).unwrap();

    let settings = ProjectionSettings {
        name_order: NameOrder::LastnameFirstname,
        avatar_storage_url: "https://cdn.example.com".into(),
    };
    let partners = family_queries::current_partners_short(&conn, a.id, &settings).unwrap();

    assert_eq!(partners.len(), 1);
    assert_eq!(partners[0].complete_name, "Berg Bob");
    assert_eq!(partners[0].initials, "BB");
    assert!(!partners[0].avatar.has_avatar);
    assert!(AVATAR_COLORS.contains(&partners[0].avatar.default_avatar_color.as_str()));

    let json = serde_json::to_value(&partners[0]).unwrap();
    assert_eq!(json["id"], serde_json::json!(b.id.to_db()));
}

#[test]
fn family_view_collects_all_three_lists() {
    let (conn, account, mut rng) = setup();
    let a = add(&conn, &account, &mut rng, "Alice", "Anders");
    let b = add(&conn, &account, &mut rng, "Bob", "Berg");
    let c = add_partial(&conn, &account, &mut rng, "Cleo");
    let g = add(&conn, &account, &mut rng, "Greta", "Anders");

    family_ops::set_relationship_with(&conn, a.id, b.id, true).unwrap();
    family_ops::is_the_offspring_of(&conn, c.id, a.id, true).unwrap();
    family_ops::is_the_offspring_of(&conn, a.id, g.id, true).unwrap();

    let view = family_queries::family_view(&conn, a.id, &ProjectionSettings::default()).unwrap();
    assert_eq!(view.contact.id, a.id);
    assert_eq!(view.partners.iter().map(|s| s.id).collect::<Vec<_>>(), vec![b.id]);
    assert_eq!(view.offsprings.iter().map(|s| s.id).collect::<Vec<_>>(), vec![c.id]);
    assert_eq!(view.progenitors.iter().map(|s| s.id).collect::<Vec<_>>(), vec![g.id]);
}

#[test]
fn edge_mutations_are_logged() {
    let (conn, account, mut rng) = setup();
    let a = add(&conn, &account, &mut rng, "Alice", "Anders");
    let b = add(&conn, &account, &mut rng, "Bob", "Berg");

    family_ops::set_relationship_with(&conn, a.id, b.id, true).unwrap();
    family_ops::unset_relationship_with(&conn, a.id, b.id, false).unwrap();
    family_ops::is_the_offspring_of(&conn, b.id, a.id, true).unwrap();

    let events = event_ops::events_for(&conn, account.id, 50).unwrap();
    let count = |ty: ObjectType, op: Operation| {
        events
            .iter()
            .filter(|e| e.object_type == ty && e.nature_of_operation == op)
            .count()
    };

    assert_eq!(count(ObjectType::Contact, Operation::Add), 2);
    assert_eq!(count(ObjectType::Relationship, Operation::Add), 2);
    assert_eq!(count(ObjectType::Relationship, Operation::Delete), 1);
    assert_eq!(count(ObjectType::Offspring, Operation::Add), 1);
    assert_eq!(count(ObjectType::Progenitor, Operation::Add), 1);
}
