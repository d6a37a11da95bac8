//! `sqlx::migrate!` embeds the SQL files at compile time, so a changed or
//! added migration has to trigger a rebuild of roster-storage.

fn main() {
    println!("cargo:rerun-if-changed=migrations");
}
