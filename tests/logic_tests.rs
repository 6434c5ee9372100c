//! Library-level tests on an in-memory database.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use logipunch::config::Config;
use logipunch::core::admin::AdminLogic;
use logipunch::core::approval::{ApprovalLogic, EntryEdit, Filter};
use logipunch::core::company::{CompanyLogic, FirstAdmin, NewCompany};
use logipunch::core::punch::PunchLogic;
use logipunch::core::session::Session;
use logipunch::core::sms::{SmsLogic, SmsRequest, SmsSender};
use logipunch::core::timesheet::TimesheetLogic;
use logipunch::db::pool::DbPool;
use logipunch::db::users;
use logipunch::errors::{AppError, AppResult};
use logipunch::models::{AppUser, EntryStatus, Project, ProjectDraft, Role, UserDraft};
use std::cell::RefCell;

fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, day)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn setup() -> (DbPool, Config, Session) {
    let mut pool = DbPool::in_memory().expect("in-memory db");
    let cfg = Config::default();
    let (company, user) = CompanyLogic::create(
        &mut pool.conn,
        &cfg,
        &NewCompany {
            name: "Excavation Test".into(),
            join_code: Some("LOGIC1".into()),
            ..Default::default()
        },
        &FirstAdmin {
            full_name: "Alice Admin".into(),
            role: Role::Administrateur,
            group: String::new(),
            pin: "1111".into(),
            pin_confirm: "1111".into(),
            phone: None,
        },
        at(1, 8, 0),
    )
    .expect("create company");
    (pool, cfg, Session { company, user })
}

fn worker(pool: &DbPool, admin: &Session, name: &str, pin: &str, role: Role, group: &str) -> AppUser {
    AdminLogic::add_user(
        &pool.conn,
        admin,
        &UserDraft {
            full_name: Some(name.into()),
            pin_code: Some(pin.into()),
            role: Some(role),
            group: Some(group.into()),
            ..Default::default()
        },
    )
    .expect("add user")
}

fn project(pool: &DbPool, admin: &Session, name: &str, number: &str) -> Project {
    AdminLogic::add_project(
        &pool.conn,
        admin,
        &ProjectDraft {
            name: Some(name.into()),
            project_number: Some(number.into()),
            ..Default::default()
        },
    )
    .expect("add project")
}

/// Closed shift from `from` to `to` o'clock on March `day`.
fn shift(pool: &DbPool, cfg: &Config, user: &AppUser, project_id: i64, day: u32, from: u32, to: u32) -> i64 {
    let machine = user.role.needs_machine().then_some("Pelle");
    let plate = user.role.needs_plate().then_some("ABC 123");
    PunchLogic::punch_in(&pool.conn, cfg, user, project_id, machine, plate, at(day, from, 0))
        .expect("punch in");
    PunchLogic::punch_out(&pool.conn, user, 0, at(day, to, 0))
        .expect("punch out")
        .id
}

#[derive(Default)]
struct RecordingSender {
    sent: RefCell<Vec<(String, String)>>,
}

impl SmsSender for RecordingSender {
    fn send(&self, to: &str, body: &str) -> AppResult<()> {
        self.sent.borrow_mut().push((to.to_string(), body.to_string()));
        Ok(())
    }
}

impl RecordingSender {
    fn last_code(&self) -> String {
        let sent = self.sent.borrow();
        let (_, body) = sent.last().expect("a message was sent");
        body.split_whitespace()
            .find(|w| w.len() == 6 && w.chars().all(|c| c.is_ascii_digit()))
            .expect("6-digit code in body")
            .to_string()
    }
}

fn with_phone(pool: &DbPool, admin: &Session) -> AppUser {
    AdminLogic::add_user(
        &pool.conn,
        admin,
        &UserDraft {
            full_name: Some("Bob Worker".into()),
            pin_code: Some("2222".into()),
            phone: Some("514-555-0199".into()),
            ..Default::default()
        },
    )
    .expect("add user")
}

#[test]
fn sms_code_expires_after_ten_minutes() {
    let (pool, cfg, admin) = setup();
    let bob = with_phone(&pool, &admin);
    let sender = RecordingSender::default();
    let sms = SmsLogic::new(&pool.conn, &cfg, &sender);

    let t0 = at(10, 9, 0);
    sms.send("5145550199", None, t0).expect("send");
    assert_eq!(sender.sent.borrow()[0].0, "+15145550199");
    let code = sender.last_code();

    let err = sms
        .verify("5145550199", &code, t0 + Duration::minutes(10) + Duration::seconds(1))
        .unwrap_err();
    assert!(err.to_string().contains("expired"));

    // the expired code is gone
    let err = sms.verify("5145550199", &code, t0 + Duration::minutes(11)).unwrap_err();
    assert!(err.to_string().contains("no pending code"));

    sms.send("5145550199", None, t0).expect("send again");
    let code = sender.last_code();
    let user = sms
        .verify("+1 514 555 0199", &code, t0 + Duration::minutes(10))
        .expect("still valid at the ten minute mark");
    assert_eq!(user.id, bob.id);
}

#[test]
fn sms_send_picks_the_user_of_the_given_company() {
    let (mut pool, cfg, admin) = setup();
    let bob = with_phone(&pool, &admin);
    let (other, boss) = CompanyLogic::create(
        &mut pool.conn,
        &cfg,
        &NewCompany {
            name: "Transport B".into(),
            join_code: Some("LOGIC2".into()),
            ..Default::default()
        },
        &FirstAdmin {
            full_name: "Bea Boss".into(),
            role: Role::Administrateur,
            group: String::new(),
            pin: "9999".into(),
            pin_confirm: "9999".into(),
            phone: Some("(514) 555-0199".into()),
        },
        at(1, 8, 0),
    )
    .expect("second company");

    let sender = RecordingSender::default();
    let sms = SmsLogic::new(&pool.conn, &cfg, &sender);
    let t0 = at(10, 9, 0);

    sms.send("5145550199", Some(other.id), t0).expect("send in second company");
    let user = sms.verify("5145550199", &sender.last_code(), t0).expect("verify");
    assert_eq!(user.id, boss.id);
    assert_eq!(user.company_id, other.id);

    // without a company the oldest user wins
    sms.send("5145550199", None, t0).expect("send anywhere");
    let user = sms.verify("5145550199", &sender.last_code(), t0).expect("verify");
    assert_eq!(user.id, bob.id);
}

#[test]
fn sms_resend_replaces_previous_code() {
    let (pool, cfg, admin) = setup();
    with_phone(&pool, &admin);
    let sender = RecordingSender::default();
    let sms = SmsLogic::new(&pool.conn, &cfg, &sender);
    let t0 = at(10, 9, 0);

    sms.send("5145550199", None, t0).expect("send");
    let first = sender.last_code();
    sms.send("5145550199", None, t0).expect("resend");
    let second = sender.last_code();

    if first != second {
        assert!(matches!(
            sms.verify("5145550199", &first, t0),
            Err(AppError::InvalidCode)
        ));
    }
    assert!(sms.verify("5145550199", &second, t0).is_ok());
}

#[test]
fn sms_request_reply_folds_errors() {
    let (pool, cfg, _admin) = setup();
    let sender = RecordingSender::default();
    let sms = SmsLogic::new(&pool.conn, &cfg, &sender);

    let reply = sms.handle(
        &SmsRequest {
            action: "dance".into(),
            phone: "5145550199".into(),
            code: None,
            company_id: None,
        },
        at(10, 9, 0),
    );
    assert!(!reply.success);
    assert!(reply.error.unwrap_or_default().contains("invalid action"));

    let reply = sms.handle(
        &SmsRequest {
            action: "send".into(),
            phone: "5145550199".into(),
            code: None,
            company_id: None,
        },
        at(10, 9, 0),
    );
    assert!(!reply.success);
    assert!(sender.sent.borrow().is_empty());
}

#[test]
fn yard_manager_sees_yard_project_only() {
    let (pool, cfg, admin) = setup();
    let yard = project(&pool, &admin, "Éco-Vrac", "26-ECO");
    let site = project(&pool, &admin, "Chantier Nord", "25-101");
    let bob = worker(&pool, &admin, "Bob", "2222", Role::Manoeuvre, "Nord");
    let gina = worker(&pool, &admin, "Gina", "3333", Role::GestionnaireCour, "Cour");

    let on_yard = shift(&pool, &cfg, &bob, yard.id, 10, 7, 11);
    shift(&pool, &cfg, &bob, site.id, 11, 7, 15);

    let seen = ApprovalLogic::visible_entries(&pool.conn, &cfg, &gina, Filter::Pending).unwrap();
    assert_eq!(seen.iter().map(|e| e.id).collect::<Vec<_>>(), vec![on_yard]);
}

#[test]
fn mechanics_manager_sees_mechanics() {
    let (pool, cfg, admin) = setup();
    let garage = project(&pool, &admin, "Mécanique", "26-MEC");
    let site = project(&pool, &admin, "Chantier Nord", "25-101");
    let marc = worker(&pool, &admin, "Marc", "2222", Role::Mecano, "Garage");
    let bob = worker(&pool, &admin, "Bob", "4444", Role::Manoeuvre, "Nord");
    let gm = worker(&pool, &admin, "Gilles", "3333", Role::GestionnaireMecanique, "Garage");

    // a Mécano only gets the mechanics project
    let available = PunchLogic::available_projects(&pool.conn, &cfg, &marc).unwrap();
    assert_eq!(available.iter().map(|p| p.id).collect::<Vec<_>>(), vec![garage.id]);
    assert!(PunchLogic::punch_in(&pool.conn, &cfg, &marc, site.id, None, None, at(10, 7, 0)).is_err());

    let id = shift(&pool, &cfg, &marc, garage.id, 10, 7, 15);
    shift(&pool, &cfg, &bob, site.id, 10, 7, 15);

    let groups = ApprovalLogic::list(&pool.conn, &cfg, &gm, Filter::Pending).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].user_name, "Marc");

    let approved = ApprovalLogic::approve(&pool.conn, &cfg, &gm, id, at(12, 8, 0)).unwrap();
    assert_eq!(approved.status, EntryStatus::Approved);
    assert_eq!(approved.approved_by.as_deref(), Some("Gilles"));
}

#[test]
fn truck_manager_sees_drivers_only() {
    let (pool, cfg, admin) = setup();
    let site = project(&pool, &admin, "Chantier Nord", "25-101");
    let tom = worker(&pool, &admin, "Tom", "2222", Role::Chauffeur, "Transport");
    let bob = worker(&pool, &admin, "Bob", "4444", Role::Manoeuvre, "Nord");
    let marc = worker(&pool, &admin, "Marc", "5555", Role::Mecano, "Garage");
    let garage = project(&pool, &admin, "Mécanique", "26-MEC");
    let gc = worker(&pool, &admin, "Guy", "3333", Role::GestionnaireChauffeur, "Transport");

    let drive = shift(&pool, &cfg, &tom, site.id, 10, 6, 14);
    let labour = shift(&pool, &cfg, &bob, site.id, 10, 7, 15);
    shift(&pool, &cfg, &marc, garage.id, 10, 7, 15);

    let seen = ApprovalLogic::visible_entries(&pool.conn, &cfg, &gc, Filter::All).unwrap();
    assert_eq!(seen.iter().map(|e| e.id).collect::<Vec<_>>(), vec![drive]);

    assert!(matches!(
        ApprovalLogic::approve(&pool.conn, &cfg, &gc, labour, at(12, 8, 0)),
        Err(AppError::Unauthorized(_))
    ));
    let approved = ApprovalLogic::approve(&pool.conn, &cfg, &gc, drive, at(12, 8, 0)).unwrap();
    assert_eq!(approved.approved_by.as_deref(), Some("Guy"));
}

#[test]
fn rejecting_leaves_approval_stamp_empty() {
    let (pool, cfg, admin) = setup();
    let site = project(&pool, &admin, "Chantier Nord", "25-101");
    let bob = worker(&pool, &admin, "Bob", "2222", Role::Manoeuvre, "Nord");
    let id = shift(&pool, &cfg, &bob, site.id, 10, 7, 15);

    let rejected = ApprovalLogic::reject(&pool.conn, &cfg, &admin.user, id, at(11, 8, 0)).unwrap();
    assert_eq!(rejected.status, EntryStatus::Rejected);
    assert_eq!(rejected.approved_by, None);
    assert_eq!(rejected.approved_at, None);
}

#[test]
fn project_assignees_restrict_availability() {
    let (pool, cfg, admin) = setup();
    let open_site = project(&pool, &admin, "Chantier", "25-101");
    let bob = worker(&pool, &admin, "Bob", "2222", Role::Manoeuvre, "Nord");
    let restricted = AdminLogic::add_project(
        &pool.conn,
        &admin,
        &ProjectDraft {
            name: Some("Restreint".into()),
            project_number: Some("25-900".into()),
            assigned_users: Some(vec![bob.id]),
            ..Default::default()
        },
    )
    .unwrap();

    let bob = users::load_user(&pool.conn, admin.company_id(), bob.id).unwrap();
    assert_eq!(bob.assigned_projects, vec![restricted.id]);
    let available = PunchLogic::available_projects(&pool.conn, &cfg, &bob).unwrap();
    assert_eq!(available.iter().map(|p| p.id).collect::<Vec<_>>(), vec![restricted.id]);

    AdminLogic::edit_project(
        &pool.conn,
        &admin,
        restricted.id,
        &ProjectDraft {
            assigned_users: Some(Vec::new()),
            ..Default::default()
        },
    )
    .unwrap();

    let bob = users::load_user(&pool.conn, admin.company_id(), bob.id).unwrap();
    assert!(bob.assigned_projects.is_empty());
    let available = PunchLogic::available_projects(&pool.conn, &cfg, &bob).unwrap();
    assert_eq!(available.len(), 2);
    assert!(available.iter().any(|p| p.id == open_site.id));
}

#[test]
fn explicit_approves_list_for_other_roles() {
    let (pool, cfg, admin) = setup();
    let site = project(&pool, &admin, "Chantier Nord", "25-101");
    let bob = worker(&pool, &admin, "Bob", "2222", Role::Manoeuvre, "Nord");
    let carl = worker(&pool, &admin, "Carl", "5555", Role::Manoeuvre, "Nord");
    let est = AdminLogic::add_user(
        &pool.conn,
        &admin,
        &UserDraft {
            full_name: Some("Estelle".into()),
            pin_code: Some("3333".into()),
            role: Some(Role::Estimateur),
            approves_users: Some(vec![bob.id]),
            ..Default::default()
        },
    )
    .unwrap();

    shift(&pool, &cfg, &bob, site.id, 10, 7, 15);
    let carls = shift(&pool, &cfg, &carl, site.id, 10, 7, 15);

    let seen = ApprovalLogic::visible_entries(&pool.conn, &cfg, &est, Filter::All).unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].user_id, bob.id);

    assert!(matches!(
        ApprovalLogic::reject(&pool.conn, &cfg, &est, carls, at(12, 8, 0)),
        Err(AppError::Unauthorized(_))
    ));
}

#[test]
fn editing_an_open_shift_submits_it() {
    let (pool, cfg, admin) = setup();
    let site = project(&pool, &admin, "Chantier Nord", "25-101");
    let bob = worker(&pool, &admin, "Bob", "2222", Role::Manoeuvre, "Nord");

    let open = PunchLogic::punch_in(&pool.conn, &cfg, &bob, site.id, None, None, at(10, 7, 0)).unwrap();
    let edited = ApprovalLogic::edit(
        &pool.conn,
        &cfg,
        &admin.user,
        open.id,
        &EntryEdit {
            punch_out: Some(at(10, 16, 0)),
            lunch: Some(60),
            ..Default::default()
        },
        at(11, 8, 0),
    )
    .unwrap();

    assert_eq!(edited.status, EntryStatus::Completed);
    assert_eq!(edited.total_hours, Some(8.0));
    assert_eq!(edited.modified_by.as_deref(), Some("Alice Admin"));
}

#[test]
fn edit_with_out_before_in_clamps_to_zero() {
    let (pool, cfg, admin) = setup();
    let site = project(&pool, &admin, "Chantier Nord", "25-101");
    let bob = worker(&pool, &admin, "Bob", "2222", Role::Manoeuvre, "Nord");
    let id = shift(&pool, &cfg, &bob, site.id, 10, 7, 15);

    let edited = ApprovalLogic::edit(
        &pool.conn,
        &cfg,
        &admin.user,
        id,
        &EntryEdit {
            punch_out: Some(at(10, 6, 0)),
            ..Default::default()
        },
        at(11, 8, 0),
    )
    .unwrap();

    assert_eq!(edited.total_hours, Some(0.0));
}

#[test]
fn timesheet_includes_shared_group_and_sorts_by_hours() {
    let (pool, cfg, admin) = setup();
    let site = project(&pool, &admin, "Chantier Nord", "25-101");
    let bob = worker(&pool, &admin, "Bob", "2222", Role::Manoeuvre, "Nord");
    let dan = worker(&pool, &admin, "Dan", "3333", Role::Manoeuvre, "Groupe DDL");
    let sue = worker(&pool, &admin, "Sue", "4444", Role::Manoeuvre, "Sud");

    shift(&pool, &cfg, &bob, site.id, 10, 7, 11);
    shift(&pool, &cfg, &dan, site.id, 10, 7, 15);
    shift(&pool, &cfg, &sue, site.id, 10, 7, 15);

    let start = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
    let ts = TimesheetLogic::build(&pool.conn, &cfg, admin.company_id(), "Nord", start).unwrap();

    let names: Vec<&str> = ts.users.iter().map(|u| u.user_name.as_str()).collect();
    assert_eq!(names, vec!["Dan", "Bob"]);
    assert_eq!(ts.total, 12.0);
    assert_eq!(ts.day_totals[1], 12.0);

    let groups = TimesheetLogic::groups(&pool.conn, admin.company_id()).unwrap();
    assert_eq!(groups, vec!["Groupe DDL", "Nord", "Sud"]);
}
