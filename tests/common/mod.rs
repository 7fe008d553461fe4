//! Shared fixture: a small reporting database on disk.
//!
//! Project "Alpha" is open, "Beta" is closed and "Gamma" has no status and
//! no tasks. Alpha has one episode (`ep01/sq01`) with the placeholder shot
//! `sh000`, two live shots and one canceled shot, plus a live and a canceled
//! character asset.

#![allow(dead_code)]

use rusqlite::Connection;
use std::path::PathBuf;
use tempfile::TempDir;
use treehouse_dashboard::config::Config;
use treehouse_dashboard::db::Database;

const SCHEMA: &str = "
CREATE TABLE project_status (id TEXT PRIMARY KEY, name TEXT NOT NULL);
CREATE TABLE project (
    id TEXT PRIMARY KEY, name TEXT NOT NULL, code TEXT,
    start_date TEXT, end_date TEXT, project_status_id TEXT
);
CREATE TABLE department (id TEXT PRIMARY KEY, name TEXT NOT NULL);
CREATE TABLE entity_type (id TEXT PRIMARY KEY, name TEXT NOT NULL);
CREATE TABLE entity (
    id TEXT PRIMARY KEY, name TEXT NOT NULL, parent_id TEXT,
    entity_type_id TEXT NOT NULL, project_id TEXT,
    nb_frames INTEGER, canceled INTEGER DEFAULT 0
);
CREATE TABLE task_type (
    id TEXT PRIMARY KEY, name TEXT NOT NULL, short_name TEXT, color TEXT,
    priority INTEGER, for_entity TEXT, department_id TEXT
);
CREATE TABLE task_status (
    id TEXT PRIMARY KEY, name TEXT NOT NULL, short_name TEXT, color TEXT,
    is_done INTEGER DEFAULT 0
);
CREATE TABLE task (
    id TEXT PRIMARY KEY, project_id TEXT NOT NULL, entity_id TEXT NOT NULL,
    task_type_id TEXT NOT NULL, task_status_id TEXT NOT NULL,
    start_date TEXT, due_date TEXT, real_start_date TEXT, end_date TEXT,
    estimation INTEGER, duration INTEGER, retake_count INTEGER,
    last_comment_date TEXT
);
CREATE TABLE person (id TEXT PRIMARY KEY, first_name TEXT, last_name TEXT);
CREATE TABLE assignations (task TEXT NOT NULL, person TEXT NOT NULL);
CREATE TABLE working_file (
    id TEXT PRIMARY KEY, task_id TEXT, person_id TEXT, name TEXT, updated_at TEXT
);
CREATE TABLE output_file (
    id TEXT PRIMARY KEY, entity_id TEXT, person_id TEXT, task_type_id TEXT,
    name TEXT, updated_at TEXT
);
CREATE TABLE comment (
    id TEXT PRIMARY KEY, object_id TEXT NOT NULL, text TEXT, checklist TEXT,
    created_at TEXT
);
CREATE TABLE preview_file (id TEXT PRIMARY KEY);
CREATE TABLE comment_preview_link (comment TEXT NOT NULL, preview_file TEXT NOT NULL);
";

const SEED: &str = "
INSERT INTO project_status VALUES ('ps-open', 'Open'), ('ps-closed', 'Closed');
INSERT INTO project VALUES
    ('p-alpha', 'Alpha', 'ALP', '2024-01-01', '2024-12-31', 'ps-open'),
    ('p-beta', 'Beta', 'BET', '2024-03-01', '2024-06-30', 'ps-closed'),
    ('p-gamma', 'Gamma', 'GAM', NULL, NULL, NULL);
INSERT INTO department VALUES ('d-anim', 'Animation'), ('d-model', 'Modeling');
INSERT INTO entity_type VALUES
    ('et-episode', 'Episode'), ('et-seq', 'Sequence'),
    ('et-shot', 'Shot'), ('et-char', 'Character');
INSERT INTO entity VALUES
    ('e-ep01', 'ep01', NULL, 'et-episode', 'p-alpha', NULL, 0),
    ('e-sq01', 'sq01', 'e-ep01', 'et-seq', 'p-alpha', NULL, 0),
    ('e-sh000', 'sh000', 'e-sq01', 'et-shot', 'p-alpha', 999, 0),
    ('e-sh010', 'sh010', 'e-sq01', 'et-shot', 'p-alpha', 48, 0),
    ('e-sh020', 'sh020', 'e-sq01', 'et-shot', 'p-alpha', 72, 0),
    ('e-sh030', 'sh030', 'e-sq01', 'et-shot', 'p-alpha', 100, 1),
    ('e-hero', 'Hero', NULL, 'et-char', 'p-alpha', NULL, NULL),
    ('e-villain', 'Villain', NULL, 'et-char', 'p-alpha', NULL, 1),
    ('e-ep02', 'ep02', NULL, 'et-episode', 'p-beta', NULL, 0),
    ('e-sq02', 'sq02', 'e-ep02', 'et-seq', 'p-beta', NULL, 0),
    ('e-sh010b', 'sh010', 'e-sq02', 'et-shot', 'p-beta', 24, 0);
INSERT INTO task_type VALUES
    ('tt-anim', 'Animation', 'ANI', '#3273dc', 1, 'Shot', 'd-anim'),
    ('tt-model', 'Modeling', 'MOD', '#8e44ad', 1, 'Asset', 'd-model');
INSERT INTO task_status VALUES
    ('ts-todo', 'Todo', 'todo', '#f5f5f5', 0),
    ('ts-wip', 'WIP', 'wip', '#f39c12', 0),
    ('ts-done', 'Done', 'done', '#22d160', 1),
    ('ts-omit', 'Omit', 'omit', '#000000', 0);
INSERT INTO task VALUES
    ('t-sh000', 'p-alpha', 'e-sh000', 'tt-anim', 'ts-wip',
     '2024-06-01', '2024-06-20', '2024-06-01T09:00:00', '2024-06-18 17:30:00', 480, 240, 1, NULL),
    ('t-sh010', 'p-alpha', 'e-sh010', 'tt-anim', 'ts-wip',
     '2024-06-03', '2024-06-25', '2024-06-02', '2024-06-24', 960, 480, 2, '2024-06-09 10:00:00'),
    ('t-sh020', 'p-alpha', 'e-sh020', 'tt-anim', 'ts-wip',
     '2024-06-10', '2024-06-28', '2024-06-12', '2024-06-27', 480, 0, 0, '2024-06-11 08:00:00'),
    ('t-sh020-todo', 'p-alpha', 'e-sh020', 'tt-anim', 'ts-todo',
     '2024-08-01', '2024-08-30', NULL, NULL, NULL, NULL, NULL, NULL),
    ('t-sh030', 'p-alpha', 'e-sh030', 'tt-anim', 'ts-wip',
     '2024-06-01', '2024-06-10', '2024-06-01', '2024-06-09', 480, 480, 0, NULL),
    ('t-sh010-omit', 'p-alpha', 'e-sh010', 'tt-anim', 'ts-omit',
     '2024-06-01', '2024-06-10', NULL, NULL, 480, NULL, NULL, NULL),
    ('t-hero', 'p-alpha', 'e-hero', 'tt-model', 'ts-done',
     '2024-05-01', '2024-05-10', '2024-05-01', '2024-05-09', 960, 960, 1, NULL),
    ('t-villain', 'p-alpha', 'e-villain', 'tt-model', 'ts-wip',
     '2024-05-01', '2024-05-10', '2024-05-01', NULL, 480, NULL, 0, NULL),
    ('t-beta', 'p-beta', 'e-sh010b', 'tt-anim', 'ts-done',
     '2024-04-01', '2024-04-10', '2024-04-01', '2024-04-09', 480, 480, 0, '2024-04-09 12:00:00');
INSERT INTO person VALUES
    ('u-ana', 'Ana', 'Lopez'), ('u-ben', 'Ben', NULL), ('u-cleo', 'Cleo', 'Park');
INSERT INTO assignations VALUES
    ('t-sh000', 'u-ana'),
    ('t-sh010', 'u-ana'), ('t-sh010', 'u-ben'),
    ('t-sh020', 'u-ben'),
    ('t-sh030', 'u-cleo'),
    ('t-sh010-omit', 'u-ana'),
    ('t-hero', 'u-cleo'),
    ('t-villain', 'u-cleo'),
    ('t-beta', 'u-ben');
INSERT INTO working_file VALUES
    ('wf-1', 't-sh010', 'u-ana', 'sh010_anim_v001', '2024-06-05 18:00:00'),
    ('wf-2', 't-sh010', 'u-ana', 'sh010_anim_v002', '2024-06-09 18:00:00'),
    ('wf-3', 't-sh010', 'u-ben', 'sh010_anim_ben_v001', '2024-06-07 12:00:00');
INSERT INTO output_file VALUES
    ('of-1', 'e-sh010', 'u-ana', 'tt-anim', 'sh010_anim_out_v001', '2024-06-10 09:00:00');
INSERT INTO comment VALUES
    ('c-1', 't-sh010', 'Needs more arcs', NULL, '2024-06-05 18:30:00'),
    ('c-2', 't-sh010', 'Approved blocking', '[]', '2024-06-09 10:00:00'),
    ('c-3', 't-sh020', 'Start with the run cycle', NULL, '2024-06-11 08:00:00'),
    ('c-4', 't-sh020-todo', 'Unassigned note', NULL, '2024-06-12 08:00:00'),
    ('c-5', 't-beta', 'Closed project note', NULL, '2024-04-09 12:00:00');
INSERT INTO preview_file VALUES ('pf-1');
INSERT INTO comment_preview_link VALUES ('c-2', 'pf-1');
";

/// Fixture database in a temp directory. Keep the `TempDir` alive for the
/// duration of the test.
pub struct Fixture {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("kitsu_reporting.db");
        let conn = Connection::open(&path).expect("create fixture database");
        conn.execute_batch(SCHEMA).expect("create schema");
        conn.execute_batch(SEED).expect("seed data");
        conn.close().expect("close fixture database");
        Self { dir, path }
    }

    /// Run extra statements against the fixture, bypassing the read-only
    /// connections the dashboard uses.
    pub fn execute(&self, sql: &str) {
        let conn = Connection::open(&self.path).expect("open fixture database");
        conn.execute_batch(sql).expect("run fixture statements");
    }

    pub fn db(&self) -> Database {
        Database::new(&self.path)
    }

    /// Default config pointed at the fixture, listening on an ephemeral port.
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.database.path = self.path.clone();
        config.server.port = 0;
        config
    }
}
