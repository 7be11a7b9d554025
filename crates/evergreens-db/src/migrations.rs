use anyhow::{Result, bail};
use rusqlite::Connection;
use tracing::info;

pub const ADMIN_EMAIL: &str = "admin@evergreens.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const ADMIN_NAME: &str = "Evergreens Admin";

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            email       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            role        TEXT NOT NULL DEFAULT 'influencer'
                        CHECK (role IN ('admin', 'influencer')),
            name        TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS proposals (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            influencer_id   INTEGER NOT NULL REFERENCES users(id),
            title           TEXT NOT NULL,
            description     TEXT NOT NULL,
            reels_count     INTEGER,
            demographics    TEXT NOT NULL,
            expected_reach  TEXT NOT NULL,
            budget          TEXT NOT NULL,
            status          TEXT NOT NULL DEFAULT 'pending'
                            CHECK (status IN ('pending', 'approved', 'rejected')),
            progress        TEXT NOT NULL DEFAULT 'not_started'
                            CHECK (progress IN ('not_started', 'in_progress', 'completed')),
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_proposals_influencer
            ON proposals(influencer_id, created_at);

        CREATE TABLE IF NOT EXISTS meetings (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            influencer_id   INTEGER NOT NULL REFERENCES users(id),
            date            TEXT NOT NULL,
            time            TEXT NOT NULL,
            mode            TEXT NOT NULL,
            status          TEXT NOT NULL DEFAULT 'pending'
                            CHECK (status IN ('pending', 'confirmed')),
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_meetings_influencer
            ON meetings(influencer_id, created_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}

/// Insert the demo admin unless some admin already exists. Check and insert
/// are one statement, so concurrent starts cannot produce two admins.
///
/// Fails when no admin exists afterwards, which happens if the seed email
/// already belongs to a non-admin account.
pub fn seed_admin(conn: &Connection) -> Result<()> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO users (email, password, role, name)
         SELECT ?1, ?2, 'admin', ?3
         WHERE NOT EXISTS (SELECT 1 FROM users WHERE role = 'admin')",
        (ADMIN_EMAIL, ADMIN_PASSWORD, ADMIN_NAME),
    )?;

    if inserted > 0 {
        info!("Seeded admin account {}", ADMIN_EMAIL);
        return Ok(());
    }

    let admins: i64 =
        conn.query_row("SELECT COUNT(*) FROM users WHERE role = 'admin'", [], |r| r.get(0))?;
    if admins == 0 {
        bail!(
            "no admin account exists and {} is registered as a non-admin user",
            ADMIN_EMAIL
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    fn admin_count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM users WHERE role = 'admin'", [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();
        seed_admin(&conn).unwrap();
        seed_admin(&conn).unwrap();
        assert_eq!(admin_count(&conn), 1);
    }

    #[test]
    fn reopening_a_file_keeps_one_admin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portal.db");

        drop(Database::open(&path).unwrap());
        let db = Database::open(&path).unwrap();

        let count = db.with_conn(|conn| Ok(admin_count(conn))).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn seed_email_taken_by_influencer_fails_startup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portal.db");
        {
            let conn = Connection::open(&path).unwrap();
            run(&conn).unwrap();
            conn.execute(
                "INSERT INTO users (email, password, role, name) VALUES (?1, 'pw', 'influencer', 'Squatter')",
                [ADMIN_EMAIL],
            )
            .unwrap();
        }

        let err = Database::open(&path).err().unwrap();
        assert!(err.to_string().contains(ADMIN_EMAIL));

        let conn = Connection::open(&path).unwrap();
        assert_eq!(admin_count(&conn), 0);
    }

    #[test]
    fn existing_admin_suppresses_seed() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        conn.execute(
            "INSERT INTO users (email, password, role, name) VALUES ('boss@x.com', 'pw', 'admin', 'Boss')",
            [],
        )
        .unwrap();

        seed_admin(&conn).unwrap();

        assert_eq!(admin_count(&conn), 1);
        let seeded: i64 = conn
            .query_row("SELECT COUNT(*) FROM users WHERE email = ?1", [ADMIN_EMAIL], |r| r.get(0))
            .unwrap();
        assert_eq!(seeded, 0);
    }
}
