use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for logipunch
/// Punch clock for crews: shifts, approvals and weekly timesheets on SQLite
#[derive(Parser)]
#[command(
    name = "logipunch",
    version = env!("CARGO_PKG_VERSION"),
    about = "Punch clock for small crews: punch in/out on projects, approve hours, export weekly timesheets",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Company join code (overrides the one saved by `company join`)
    #[arg(global = true, long = "company", value_name = "CODE")]
    pub company: Option<String>,

    /// PIN of the user running the command
    #[arg(global = true, long = "pin")]
    pub pin: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Show or edit the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "edit", help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)")]
        edit_config: bool,

        #[arg(long = "editor", help = "Specify the editor to use (vim, nano, or custom path)")]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long, help = "Only the N most recent rows")]
        limit: Option<usize>,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f', help = "Overwrite an existing file without asking")]
        force: bool,
    },

    /// Create, join or edit a company
    Company {
        #[command(subcommand)]
        action: CompanyCmd,
    },

    /// Manage users (admin)
    User {
        #[command(subcommand)]
        action: UserCmd,
    },

    /// Manage projects (admin)
    Project {
        #[command(subcommand)]
        action: ProjectCmd,
    },

    /// Check a PIN and show the current shift and available projects
    Login,

    /// Punch in, out, or move to another project
    Punch {
        #[command(subcommand)]
        action: PunchCmd,
    },

    /// Your hours for one week
    Hours {
        #[arg(long, value_name = "DATE", help = "Any date of the week (YYYY-MM-DD), default this week")]
        week: Option<String>,

        #[arg(long, value_name = "ID", help = "Delete one of your entries (not approved yet)")]
        delete: Option<i64>,
    },

    /// Review, approve and correct submitted shifts
    Approvals {
        #[command(subcommand)]
        action: ApprovalCmd,
    },

    /// Who is punched in right now
    Active,

    /// Weekly timesheet of a group, with optional export
    Timesheet {
        #[arg(long, help = "Group to show (omit to list groups)")]
        group: Option<String>,

        #[arg(long, value_name = "DATE", help = "Any date of the week (YYYY-MM-DD), default this week")]
        week: Option<String>,

        #[arg(long, value_enum)]
        export: Option<ExportFormat>,

        #[arg(long, value_name = "FILE", requires = "export")]
        file: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// One-time SMS codes to recover a forgotten company code
    Sms {
        #[command(subcommand)]
        action: SmsCmd,
    },
}

#[derive(Subcommand)]
pub enum CompanyCmd {
    /// Create a company and its first administrator
    Create {
        #[arg(long)]
        name: String,

        #[arg(long = "admin-name")]
        admin_name: String,

        #[arg(long = "admin-role", default_value = "Administrateur")]
        admin_role: String,

        #[arg(long = "admin-group", default_value = "")]
        admin_group: String,

        #[arg(long = "admin-pin", help = "4-digit PIN of the administrator")]
        admin_pin: String,

        #[arg(long = "confirm-pin", help = "Same PIN again (asked interactively when omitted)")]
        confirm_pin: Option<String>,

        #[arg(long = "admin-phone")]
        admin_phone: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long, value_name = "FILE")]
        logo: Option<String>,

        #[arg(long = "join-code", help = "Use this join code instead of a random one")]
        join_code: Option<String>,
    },

    /// Remember a company by its join code
    Join { code: String },

    /// Show the current company (needs the settings page)
    Show,

    /// Edit the current company (admin)
    Update {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long, value_name = "FILE")]
        logo: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum UserCmd {
    /// Add a user
    Add {
        #[arg(long)]
        name: String,

        #[arg(long = "user-pin", help = "4-digit PIN of the new user")]
        user_pin: String,

        #[arg(long)]
        role: Option<String>,

        #[arg(long)]
        group: Option<String>,

        #[arg(long, value_delimiter = ',', help = "Assigned project ids")]
        projects: Vec<i64>,

        #[arg(long, value_delimiter = ',', help = "Allowed pages (punch,my-hours,approvals,timesheet,active,settings)")]
        pages: Vec<String>,

        #[arg(long, value_delimiter = ',', help = "Ids of the users this user approves")]
        approves: Vec<i64>,

        #[arg(long)]
        admin: bool,

        #[arg(long)]
        phone: Option<String>,
    },

    /// Edit a user
    Edit {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long = "user-pin")]
        user_pin: Option<String>,

        #[arg(long)]
        role: Option<String>,

        #[arg(long)]
        group: Option<String>,

        #[arg(long, value_delimiter = ',', num_args = 0..)]
        projects: Option<Vec<i64>>,

        #[arg(long, value_delimiter = ',', num_args = 0..)]
        pages: Option<Vec<String>>,

        #[arg(long, value_delimiter = ',', num_args = 0..)]
        approves: Option<Vec<i64>>,

        #[arg(long)]
        admin: Option<bool>,

        #[arg(long, help = "Phone number (empty string clears it)")]
        phone: Option<String>,
    },

    /// Deactivate a user
    Remove { id: i64 },

    /// List active users
    List,
}

#[derive(Subcommand)]
pub enum ProjectCmd {
    /// Add a project
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        number: String,

        #[arg(long)]
        address: Option<String>,

        #[arg(long, value_delimiter = ',', help = "Assigned user ids")]
        users: Vec<i64>,
    },

    /// Edit a project
    Edit {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        number: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long, value_delimiter = ',', num_args = 0..)]
        users: Option<Vec<i64>>,
    },

    /// Assign a user to the project, or unassign if already assigned
    Assign {
        id: i64,

        #[arg(long)]
        user: i64,
    },

    /// Deactivate a project
    Remove { id: i64 },

    /// List active projects
    List,
}

#[derive(Subcommand)]
pub enum PunchCmd {
    /// Start a shift
    In {
        #[arg(long, help = "Project id")]
        project: i64,

        #[arg(long, help = "Machine (required for Opérateur)")]
        machine: Option<String>,

        #[arg(long, help = "Plate number (required for Chauffeur)")]
        plate: Option<String>,

        #[arg(long, value_name = "YYYY-MM-DD HH:MM", help = "Punch time, default now")]
        at: Option<String>,
    },

    /// End the current shift
    Out {
        #[arg(long, default_value_t = 0, help = "Lunch break in minutes (0, 15, 30, 45, 60 or up to 120)")]
        lunch: i64,

        #[arg(long, value_name = "YYYY-MM-DD HH:MM")]
        at: Option<String>,
    },

    /// Close the current shift and start one on another project
    Switch {
        #[arg(long)]
        project: i64,

        #[arg(long)]
        machine: Option<String>,

        #[arg(long, value_name = "YYYY-MM-DD HH:MM")]
        at: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ApprovalCmd {
    /// Entries you can approve, grouped by user
    List {
        #[arg(long, help = "Include every status, not only pending")]
        all: bool,
    },

    /// Approve a pending entry
    Approve { id: i64 },

    /// Reject a pending entry
    Reject { id: i64 },

    /// Correct an entry
    Edit {
        id: i64,

        #[arg(long = "in", value_name = "YYYY-MM-DD HH:MM")]
        punch_in: Option<String>,

        #[arg(long = "out", value_name = "YYYY-MM-DD HH:MM")]
        punch_out: Option<String>,

        #[arg(long)]
        lunch: Option<i64>,

        #[arg(long)]
        project: Option<i64>,
    },
}

#[derive(Subcommand)]
pub enum SmsCmd {
    /// Text a one-time code to a phone number
    Send {
        phone: String,

        #[arg(long, help = "Print the raw reply as JSON")]
        json: bool,
    },

    /// Check a code and join the user's company
    Verify {
        phone: String,

        code: String,

        #[arg(long)]
        json: bool,
    },
}
