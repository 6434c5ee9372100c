use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use std::sync::LazyLock;

const OP_WIDTH: usize = 48;

static ANSI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("static ANSI pattern"));

fn strip_ansi(s: &str) -> String {
    ANSI.replace_all(s, "").into_owned()
}

/// Colour of each audited operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "punch_in" => Colour::Green,
        "punch_out" => Colour::Cyan,
        "switch" => Colour::Blue,
        "approve" => Colour::Green,
        "reject" | "del" => Colour::Red,
        "edit" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "backup" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51),
        other if other.starts_with("sms_") => Colour::Cyan,
        other if other.starts_with("user_") || other.starts_with("project_") => Colour::Yellow,
        other if other.starts_with("company_") => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool, limit: Option<usize>) -> AppResult<()> {
        let mut rows = load_log(&pool.conn, limit)?;
        rows.reverse();

        if rows.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let id_w = rows.iter().map(|r| r.id.to_string().len()).max().unwrap_or(1);

        println!("📜 Internal log:\n");

        for r in rows {
            let date = chrono::DateTime::parse_from_rfc3339(&r.date)
                .map(|dt| dt.format("%F %T").to_string())
                .unwrap_or(r.date);

            let color = color_for_operation(&r.operation);
            let op = if r.target.is_empty() {
                color.paint(r.operation.as_str()).to_string()
            } else {
                format!("{} ({})", color.paint(r.operation.as_str()), r.target)
            };

            // truncate on visible width, then restore the colour of the operation
            let visible = strip_ansi(&op);
            let shown = if visible.chars().count() > OP_WIDTH {
                let mut cut: String = visible.chars().take(OP_WIDTH - 3).collect();
                cut.push_str("...");
                match cut.split_once(' ') {
                    Some((word, rest)) => format!("{} {}", color.paint(word), rest),
                    None => color.paint(cut.as_str()).to_string(),
                }
            } else {
                op
            };
            let padding = " ".repeat(OP_WIDTH.saturating_sub(strip_ansi(&shown).chars().count()));

            println!("{:>id_w$}: {} | {}{} => {}", r.id, date, shown, padding, r.message);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_color_codes() {
        let painted = Colour::Green.paint("punch_in").to_string();
        assert_eq!(strip_ansi(&painted), "punch_in");
    }
}
