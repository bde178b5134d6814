//! SQLite-backed sale point directory and path store.
//!
//! Schema: `sale_points (id, name UNIQUE)` and `paths (id_a, id_b, cost)`.
//! Path identity is the unordered endpoint pair; rows keep the orientation
//! they were inserted with and every pair lookup matches both orientations.
//! Path reads join `sale_points` for endpoint names, so rows left dangling
//! by a sale-point delete drop out of reads instead of surfacing phantom
//! endpoints.

use std::path::Path;

use rusqlite::{params, Connection};

use crate::error::Result;
use crate::model::{Edge, PointId, SalePoint};

const EDGE_SELECT: &str = "p.id_a, p.id_b, p.cost, a.name, b.name
     FROM paths p
     JOIN sale_points a ON a.id = p.id_a
     JOIN sale_points b ON b.id = p.id_b";

/// Durable store for sale points and the paths connecting them.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (creating if missing) a store at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Opens a transient in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        // The bundled SQLite is compiled with SQLITE_DEFAULT_FOREIGN_KEYS=1;
        // pin the pragma to SQLite's documented default so sale-point deletes
        // leave path rows dangling (see module docs).
        conn.pragma_update(None, "foreign_keys", "OFF")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS sale_points (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS paths (
                id_a INTEGER NOT NULL,
                id_b INTEGER NOT NULL,
                cost REAL NOT NULL,
                PRIMARY KEY (id_a, id_b),
                FOREIGN KEY (id_a) REFERENCES sale_points (id),
                FOREIGN KEY (id_b) REFERENCES sale_points (id)
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_paths_a ON paths (id_a)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_paths_b ON paths (id_b)",
            [],
        )?;

        Ok(())
    }

    /// Inserts a sale point and returns it with its assigned id.
    pub fn insert_sale_point(&mut self, name: &str) -> Result<SalePoint> {
        self.conn.execute(
            "INSERT INTO sale_points (name) VALUES (?1)",
            params![name],
        )?;
        let id = self.conn.last_insert_rowid() as PointId;
        Ok(SalePoint {
            id,
            name: name.to_string(),
        })
    }

    /// Looks up a sale point by id.
    pub fn sale_point(&self, id: PointId) -> Result<Option<SalePoint>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM sale_points WHERE id = ?1")?;

        let rows = stmt.query_map([id as i64], |row| {
            let id: i64 = row.get(0)?;
            Ok(SalePoint {
                id: id as PointId,
                name: row.get(1)?,
            })
        })?;

        for row in rows {
            return Ok(Some(row?));
        }

        Ok(None)
    }

    /// Returns true if any sale point already uses the given name.
    pub fn sale_point_name_exists(&self, name: &str) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare("SELECT EXISTS(SELECT 1 FROM sale_points WHERE name = ?1)")?;
        let exists: bool = stmt.query_row(params![name], |row| row.get(0))?;
        Ok(exists)
    }

    /// Lists all sale points ordered by id.
    pub fn all_sale_points(&self) -> Result<Vec<SalePoint>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM sale_points ORDER BY id")?;

        let rows = stmt.query_map([], |row| {
            let id: i64 = row.get(0)?;
            Ok(SalePoint {
                id: id as PointId,
                name: row.get(1)?,
            })
        })?;

        let mut points = Vec::new();
        for row in rows {
            points.push(row?);
        }

        Ok(points)
    }

    /// Renames a sale point; returns false if the id does not exist.
    pub fn rename_sale_point(&mut self, id: PointId, name: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE sale_points SET name = ?2 WHERE id = ?1",
            params![id as i64, name],
        )?;
        Ok(changed > 0)
    }

    /// Deletes a sale point; returns false if the id does not exist.
    ///
    /// Paths referencing the point are left in place (see module docs).
    pub fn delete_sale_point(&mut self, id: PointId) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM sale_points WHERE id = ?1", params![id as i64])?;
        Ok(changed > 0)
    }

    /// Inserts a path row in the requested orientation.
    pub fn insert_edge(&mut self, id_a: PointId, id_b: PointId, cost: f64) -> Result<()> {
        self.conn.execute(
            "INSERT INTO paths (id_a, id_b, cost) VALUES (?1, ?2, ?3)",
            params![id_a as i64, id_b as i64, cost],
        )?;
        Ok(())
    }

    /// Looks up a path by endpoint pair, matching either orientation.
    pub fn edge(&self, id_a: PointId, id_b: PointId) -> Result<Option<Edge>> {
        let sql = format!(
            "SELECT {EDGE_SELECT}
             WHERE (p.id_a = ?1 AND p.id_b = ?2) OR (p.id_a = ?2 AND p.id_b = ?1)"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([id_a as i64, id_b as i64], map_edge_row)?;

        for row in rows {
            return Ok(Some(row?));
        }

        Ok(None)
    }

    /// Returns true if a path row exists between the pair in either
    /// orientation.
    ///
    /// Checks the raw table (no name join) so the duplicate-pair invariant
    /// holds even against rows dangling after a sale-point delete.
    pub fn edge_row_exists(&self, id_a: PointId, id_b: PointId) -> Result<bool> {
        let mut stmt = self.conn.prepare(
            "SELECT EXISTS(SELECT 1 FROM paths
             WHERE (id_a = ?1 AND id_b = ?2) OR (id_a = ?2 AND id_b = ?1))",
        )?;
        let exists: bool = stmt.query_row([id_a as i64, id_b as i64], |row| row.get(0))?;
        Ok(exists)
    }

    /// Lists every path touching the given sale point from either side.
    pub fn edges_touching(&self, id: PointId) -> Result<Vec<Edge>> {
        let sql = format!("SELECT {EDGE_SELECT} WHERE p.id_a = ?1 OR p.id_b = ?1");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([id as i64], map_edge_row)?;

        let mut edges = Vec::new();
        for row in rows {
            edges.push(row?);
        }

        Ok(edges)
    }

    /// Lists all paths, ordered by stored endpoint pair.
    pub fn all_edges(&self) -> Result<Vec<Edge>> {
        let sql = format!("SELECT {EDGE_SELECT} ORDER BY p.id_a, p.id_b");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], map_edge_row)?;

        let mut edges = Vec::new();
        for row in rows {
            edges.push(row?);
        }

        Ok(edges)
    }

    /// Updates a path's cost in its stored orientation; returns false if no
    /// row matches the pair in either orientation.
    pub fn update_edge_cost(&mut self, id_a: PointId, id_b: PointId, cost: f64) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE paths SET cost = ?3
             WHERE (id_a = ?1 AND id_b = ?2) OR (id_a = ?2 AND id_b = ?1)",
            params![id_a as i64, id_b as i64, cost],
        )?;
        Ok(changed > 0)
    }

    /// Deletes a path; returns false if no row matches the pair in either
    /// orientation.
    pub fn delete_edge(&mut self, id_a: PointId, id_b: PointId) -> Result<bool> {
        let changed = self.conn.execute(
            "DELETE FROM paths
             WHERE (id_a = ?1 AND id_b = ?2) OR (id_a = ?2 AND id_b = ?1)",
            params![id_a as i64, id_b as i64],
        )?;
        Ok(changed > 0)
    }
}

fn map_edge_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Edge> {
    let id_a: i64 = row.get(0)?;
    let id_b: i64 = row.get(1)?;
    Ok(Edge {
        sale_point_a: SalePoint {
            id: id_a as PointId,
            name: row.get(3)?,
        },
        sale_point_b: SalePoint {
            id: id_b as PointId,
            name: row.get(4)?,
        },
        cost: row.get(2)?,
    })
}
