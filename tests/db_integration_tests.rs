//! Integration tests for the reporting queries.
//!
//! Every test builds the on-disk fixture from `common` and runs the real
//! SQL against it through a read-only connection.

mod common;

use common::Fixture;
use treehouse_dashboard::calcs::{StatusDescription, TaskCalcs};
use treehouse_dashboard::db::Database;
use treehouse_dashboard::error::{DashboardError, ErrorCode};

mod connection_tests {
    use super::*;

    #[test]
    fn check_reports_projects_and_tables() {
        let fixture = Fixture::new();
        let info = fixture.db().check().expect("check should succeed");

        assert_eq!(info.path, fixture.path);
        assert_eq!(info.project_count, 3);
        assert_eq!(info.open_project_count, 1);
        assert_eq!(info.table_count, 15);
        assert!(!info.sqlite_version.is_empty());
    }

    #[test]
    fn missing_database_is_a_database_error() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("absent.db"));

        let err = db.shot_summary().unwrap_err();
        assert_eq!(DashboardError::from(err).code, ErrorCode::DatabaseError);
    }

    #[test]
    fn connections_are_read_only() {
        let fixture = Fixture::new();
        let err = fixture
            .db()
            .with_conn(|conn| {
                conn.execute("DELETE FROM project", [])?;
                Ok(())
            })
            .unwrap_err();
        assert_eq!(DashboardError::from(err).code, ErrorCode::DatabaseError);
        assert_eq!(fixture.db().check().unwrap().project_count, 3);
    }
}

mod project_tests {
    use super::*;

    #[test]
    fn project_summary_counts_tasks_and_completion() {
        let fixture = Fixture::new();
        let rows = fixture.db().project_summary().unwrap();

        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Beta", "Gamma"]);

        let alpha = &rows[0];
        assert_eq!(alpha.total_tasks, 8);
        assert_eq!(alpha.completed_tasks, 1);
        assert_eq!(alpha.perc_completed, 12.5);
        assert_eq!(alpha.duration, Some(365));
        assert_eq!(alpha.project_status.as_deref(), Some("Open"));

        let beta = &rows[1];
        assert_eq!(beta.perc_completed, 100.0);
        assert_eq!(beta.duration, Some(121));
    }

    #[test]
    fn project_without_tasks_or_dates() {
        let fixture = Fixture::new();
        let rows = fixture.db().project_summary().unwrap();
        let gamma = rows.iter().find(|r| r.name == "Gamma").unwrap();

        assert_eq!(gamma.total_tasks, 0);
        assert_eq!(gamma.perc_completed, 0.0);
        assert_eq!(gamma.duration, None);
        assert_eq!(gamma.project_status, None);
    }
}

mod shot_tests {
    use super::*;

    #[test]
    fn shot_summary_groups_by_status_in_open_projects() {
        let fixture = Fixture::new();
        let rows = fixture.db().shot_summary().unwrap();

        // Beta is closed; Omit is hidden.
        let statuses: Vec<&str> = rows.iter().map(|r| r.task_status.as_str()).collect();
        assert_eq!(statuses, ["Todo", "WIP"]);
        assert!(rows.iter().all(|r| r.project == "Alpha"));
        assert!(rows.iter().all(|r| r.episode == "ep01"));
    }

    #[test]
    fn placeholder_and_canceled_shots_do_not_count() {
        let fixture = Fixture::new();
        let rows = fixture.db().shot_summary().unwrap();
        let wip = rows.iter().find(|r| r.task_status == "WIP").unwrap();

        assert_eq!(wip.nb_frames, Some(120));
        assert_eq!(wip.shot_count, 2);
        assert_eq!(wip.task_estimation, Some(1920.0));
        assert_eq!(wip.task_duration, Some(720.0));
        assert_eq!(wip.retake_count, Some(3));
        assert_eq!(wip.task_start_date.as_deref(), Some("2024-06-01"));
        assert_eq!(wip.task_due_date.as_deref(), Some("2024-06-28"));
        assert_eq!(wip.task_end_date.as_deref(), Some("2024-06-27"));
        assert_eq!(wip.department.as_deref(), Some("Animation"));
        assert_eq!(wip.project_code.as_deref(), Some("ALP"));
    }

    #[test]
    fn artists_cover_the_episode_without_canceled_shots() {
        let fixture = Fixture::new();
        let rows = fixture.db().shot_summary().unwrap();
        let wip = rows.iter().find(|r| r.task_status == "WIP").unwrap();
        let artists = wip.artists.as_deref().unwrap();

        assert!(artists.contains("Ana Lopez"));
        assert!(artists.contains("Ben"));
        assert!(!artists.contains("Cleo"));
        assert!(artists.contains(", "));

        assert_eq!(artists.matches("Ana Lopez").count(), 1);

        let todo = rows.iter().find(|r| r.task_status == "Todo").unwrap();
        assert_eq!(todo.artists, None);
        assert_eq!(todo.task_estimation, None);
    }

    #[test]
    fn derived_columns_on_the_wip_group() {
        let fixture = Fixture::new();
        let rows = fixture.db().shot_summary().unwrap();
        let wip = rows.iter().find(|r| r.task_status == "WIP").unwrap();
        let calcs = TaskCalcs::derive(wip);

        assert_eq!(calcs.calc_task_real_start_date, "2024-06-01");
        assert_eq!(calcs.calc_estimate, Some(4.0));
        assert_eq!(calcs.calc_duration, Some(1.5));
        assert_eq!(calcs.status_description, StatusDescription::StartedLate);
    }
}

mod asset_tests {
    use super::*;

    #[test]
    fn asset_tasks_skip_canceled_assets() {
        let fixture = Fixture::new();
        let rows = fixture.db().asset_tasks().unwrap();

        assert_eq!(rows.len(), 1);
        let hero = &rows[0];
        assert_eq!(hero.asset_name, "Hero");
        assert_eq!(hero.entity_type, "Character");
        assert_eq!(hero.task_type, "Modeling");
        assert_eq!(hero.task_status, "Done");
        assert_eq!(hero.artists.as_deref(), Some("Cleo Park"));
        assert_eq!(hero.task_estimation, Some(960.0));

        let calcs = TaskCalcs::derive(hero);
        assert_eq!(calcs.status_description, StatusDescription::StartedOnTime);
    }

    #[test]
    fn commas_inside_artist_names_are_kept() {
        let fixture = Fixture::new();
        fixture.execute(
            "INSERT INTO person VALUES ('u-dana', 'Dana', 'Ruiz, Jr.');
             INSERT INTO assignations VALUES ('t-hero', 'u-dana');",
        );
        let rows = fixture.db().asset_tasks().unwrap();
        let artists = rows[0].artists.as_deref().unwrap();

        assert!(
            artists == "Cleo Park, Dana Ruiz, Jr." || artists == "Dana Ruiz, Jr., Cleo Park",
            "unexpected artists: {}",
            artists
        );
    }
}

mod artist_tests {
    use super::*;

    #[test]
    fn one_row_per_assignment_sorted_by_artist() {
        let fixture = Fixture::new();
        let rows = fixture.db().artist_tasks().unwrap();

        let keys: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.artist.as_str(), r.task.as_str()))
            .collect();
        assert_eq!(
            keys,
            [
                ("Ana Lopez", "ep01_sq01_sh000"),
                ("Ana Lopez", "ep01_sq01_sh010"),
                ("Ben", "ep01_sq01_sh010"),
                ("Ben", "ep01_sq01_sh020"),
                ("Cleo Park", "Hero"),
            ]
        );
    }

    #[test]
    fn assets_without_parents_are_in_every_episode() {
        let fixture = Fixture::new();
        let rows = fixture.db().artist_tasks().unwrap();

        let hero = rows.iter().find(|r| r.task == "Hero").unwrap();
        assert_eq!(hero.episode, "ALL");
        assert_eq!(hero.for_entity.as_deref(), Some("Asset"));

        let shot = rows.iter().find(|r| r.task == "ep01_sq01_sh020").unwrap();
        assert_eq!(shot.episode, "ep01");
        assert_eq!(shot.entity_type, "Shot");
    }

    #[test]
    fn latest_files_are_per_assignee() {
        let fixture = Fixture::new();
        let rows = fixture.db().artist_tasks().unwrap();

        let ana = rows
            .iter()
            .find(|r| r.artist == "Ana Lopez" && r.task == "ep01_sq01_sh010")
            .unwrap();
        assert_eq!(ana.working_file_name.as_deref(), Some("sh010_anim_v002"));
        assert_eq!(ana.output_file_name.as_deref(), Some("sh010_anim_out_v001"));

        let ben = rows
            .iter()
            .find(|r| r.artist == "Ben" && r.task == "ep01_sq01_sh010")
            .unwrap();
        assert_eq!(ben.working_file_name.as_deref(), Some("sh010_anim_ben_v001"));
        assert_eq!(ben.output_file_name, None);
    }
}

mod comment_tests {
    use super::*;

    #[test]
    fn comments_on_assigned_shot_tasks_newest_first() {
        let fixture = Fixture::new();
        let rows = fixture.db().task_comments().unwrap();

        let texts: Vec<&str> = rows
            .iter()
            .map(|r| r.comment_text.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(
            texts,
            ["Approved blocking", "Needs more arcs", "Start with the run cycle"]
        );
    }

    #[test]
    fn comment_rows_carry_preview_and_due_date() {
        let fixture = Fixture::new();
        let rows = fixture.db().task_comments().unwrap();

        let approved = &rows[0];
        assert_eq!(approved.shot, "sh010");
        assert_eq!(approved.scene, "sq01");
        assert_eq!(approved.preview_file_id.as_deref(), Some("pf-1"));
        assert_eq!(approved.task_end_date.as_deref(), Some("2024-06-25"));
        assert_eq!(approved.comment_checklist.as_deref(), Some("[]"));

        assert_eq!(rows[1].preview_file_id, None);
    }
}
