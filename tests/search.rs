use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use chrono::{NaiveTime, Weekday};
use session_scheduler::schedule::runner::{run_trial, trial_rng};
use session_scheduler::schedule::{
    run, score, slots_adjacent, slots_conflict, InstructorPreference, Session, TimeSlot, TrialRunner,
};
use session_scheduler::{run_scheduler, SearchConfig};

mod common {
    use super::*;

    pub fn slot(day: Weekday, start: u32, end: u32) -> TimeSlot {
        TimeSlot::new(
            day,
            NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(end, 0, 0).unwrap(),
        )
        .unwrap()
    }

    pub fn pref(id: &str, slot: TimeSlot) -> InstructorPreference {
        InstructorPreference {
            instructor_id: id.to_string(),
            name: format!("Instructor {}", id),
            slot,
        }
    }

    pub fn config(epochs: usize, replicates: usize, max_attempts: usize, seed: u64) -> SearchConfig {
        SearchConfig {
            epochs,
            replicates,
            max_attempts,
            seed: Some(seed),
            threads: None,
        }
    }

    /// A week of hourly sessions with three instructors covering overlapping parts of it
    pub fn weekly_problem() -> (Vec<Session>, Vec<InstructorPreference>) {
        let days = [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri];
        let mut sessions = Vec::new();
        let mut prefs = Vec::new();

        for (d, &day) in days.iter().enumerate() {
            for hour in 9..15 {
                sessions.push(Session { slot: slot(day, hour, hour + 1) });
                // Two sections at 10 AM every day
                if hour == 10 {
                    sessions.push(Session { slot: slot(day, hour, hour + 1) });
                }
                if (hour + d as u32) % 2 == 0 {
                    prefs.push(pref("alice", slot(day, hour, hour + 1)));
                }
                if hour < 12 {
                    prefs.push(pref("bob", slot(day, hour, hour + 1)));
                }
                if day != Weekday::Wed {
                    prefs.push(pref("carol", slot(day, hour, hour + 1)));
                }
            }
        }

        (sessions, prefs)
    }

    pub fn scratch_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!("session-scheduler-it-{}-{}", label, std::process::id()))
    }
}

mod properties {
    use super::common::*;
    use super::*;

    #[test]
    fn test_completeness() {
        let (sessions, prefs) = weekly_problem();
        let best = run(&sessions, &prefs, config(20, 3, 3, 1)).unwrap();

        assert_eq!(best.assignment.len(), sessions.len());
        for (entry, session) in best.assignment.iter().zip(&sessions) {
            assert_eq!(entry.session, session);
        }
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let (sessions, prefs) = weekly_problem();

        let first = run(&sessions, &prefs, config(30, 4, 3, 2024)).unwrap();
        let second = run(&sessions, &prefs, config(30, 4, 3, 2024)).unwrap();
        let single_thread = run(
            &sessions,
            &prefs,
            SearchConfig { threads: Some(1), ..config(30, 4, 3, 2024) },
        )
        .unwrap();

        assert_eq!(first, second);
        assert_eq!(first, single_thread);
    }

    #[test]
    fn test_best_is_at_least_every_trial() {
        let (sessions, prefs) = weekly_problem();
        let cfg = config(10, 5, 2, 77);
        let runner = TrialRunner::new(&sessions, &prefs, cfg).unwrap();
        let best = runner.run().unwrap();

        for trial in 0..cfg.total_trials() {
            let result = runner.run_trial(trial);
            assert!(best.score >= result.score, "trial {} scored {} > best {}", trial, result.score, best.score);
            if result.score == best.score {
                assert!(best.trial <= trial);
            }
        }
        assert_eq!(runner.run_trial(best.trial), best);
    }

    #[test]
    fn test_score_matches_independent_recount() {
        let (sessions, prefs) = weekly_problem();
        let best = run(&sessions, &prefs, config(15, 2, 4, 3)).unwrap();
        let entries = best.assignment.entries();

        let mut expected = 0i64;
        for (i, a) in entries.iter().enumerate() {
            if a.instructor.is_none() {
                expected -= 5;
            }
            for b in &entries[i + 1..] {
                if let (Some(x), Some(y)) = (a.instructor, b.instructor) {
                    if x.instructor_id == y.instructor_id && slots_adjacent(&a.session.slot, &b.session.slot) {
                        expected += 2;
                    }
                }
            }
        }

        assert_eq!(best.score, expected);
        assert_eq!(score(&best.assignment), expected);
    }

    #[test]
    fn test_no_instructor_double_booked() {
        let (sessions, prefs) = weekly_problem();
        for seed in 0..5 {
            let best = run(&sessions, &prefs, config(10, 2, 5, seed)).unwrap();
            let entries = best.assignment.entries();

            for (i, a) in entries.iter().enumerate() {
                for b in &entries[i + 1..] {
                    if let (Some(x), Some(y)) = (a.instructor, b.instructor) {
                        assert!(
                            !(x.instructor_id == y.instructor_id && slots_conflict(&a.session.slot, &b.session.slot)),
                            "{} double-booked",
                            x.instructor_id
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_bound_preference_matches_session_slot() {
        let (sessions, prefs) = weekly_problem();
        let best = run(&sessions, &prefs, config(10, 2, 5, 8)).unwrap();

        for entry in best.assignment.iter() {
            if let Some(pref) = entry.instructor {
                assert_eq!(pref.slot, entry.session.slot);
            }
        }
    }

    #[test]
    fn test_each_preference_used_at_most_once() {
        let (sessions, prefs) = weekly_problem();
        let best = run(&sessions, &prefs, config(10, 2, 5, 12)).unwrap();

        let mut uses: HashMap<*const InstructorPreference, usize> = HashMap::new();
        for entry in best.assignment.iter() {
            if let Some(pref) = entry.instructor {
                *uses.entry(pref as *const _).or_insert(0) += 1;
            }
        }
        assert!(uses.values().all(|&n| n == 1));
    }
}

mod scenarios {
    use super::common::*;
    use super::*;

    #[test]
    fn scenario_a_one_instructor_two_adjacent_sessions() {
        let sessions = vec![
            Session { slot: slot(Weekday::Mon, 9, 10) },
            Session { slot: slot(Weekday::Mon, 10, 11) },
        ];
        let prefs = vec![pref("a", sessions[0].slot), pref("a", sessions[1].slot)];

        let best = run(&sessions, &prefs, config(1, 1, 10, 0)).unwrap();

        assert_eq!(best.assignment.filled_count(), 2);
        assert!(best.assignment.iter().all(|e| e.instructor.map(|p| p.instructor_id.as_str()) == Some("a")));
        assert_eq!(best.score, 2);
    }

    #[test]
    fn scenario_a_holds_over_many_trials_for_any_seed() {
        let sessions = vec![
            Session { slot: slot(Weekday::Mon, 9, 10) },
            Session { slot: slot(Weekday::Mon, 10, 11) },
        ];
        let prefs = vec![pref("a", sessions[0].slot), pref("a", sessions[1].slot)];

        for seed in 0..10 {
            let best = run(&sessions, &prefs, config(20, 5, 10, seed)).unwrap();
            assert_eq!(best.score, 2);
        }
    }

    #[test]
    fn scenario_b_no_instructors() {
        let sessions = vec![Session { slot: slot(Weekday::Mon, 9, 10) }];

        let best = run(&sessions, &[], config(3, 3, 10, 5)).unwrap();

        assert_eq!(best.assignment.len(), 1);
        assert!(best.assignment.entries()[0].instructor.is_none());
        assert_eq!(best.score, -5);
    }

    #[test]
    fn scenario_c_two_instructors_non_adjacent_slots() {
        let sessions = vec![
            Session { slot: slot(Weekday::Mon, 9, 10) },
            Session { slot: slot(Weekday::Mon, 13, 14) },
        ];
        let prefs = vec![pref("a", sessions[0].slot), pref("b", sessions[1].slot)];

        let best = run(&sessions, &prefs, config(10, 5, 10, 17)).unwrap();

        assert_eq!(best.assignment.filled_count(), 2);
        assert_eq!(best.assignment.entries()[0].instructor.unwrap().instructor_id, "a");
        assert_eq!(best.assignment.entries()[1].instructor.unwrap().instructor_id, "b");
        assert_eq!(best.score, 0);
    }

    #[test]
    fn scenario_d_more_trials_never_lower_best() {
        let (sessions, prefs) = weekly_problem();
        let mut previous = i64::MIN;

        for epochs in [1, 2, 5, 10, 40] {
            let best = run(&sessions, &prefs, config(epochs, 3, 2, 4242)).unwrap();
            assert!(best.score >= previous, "{} epochs scored {} < {}", epochs, best.score, previous);
            previous = best.score;
        }
    }

    #[test]
    fn single_trial_matches_runner() {
        let (sessions, prefs) = weekly_problem();
        let best = run(&sessions, &prefs, config(1, 1, 3, 31)).unwrap();
        let mut rng = trial_rng(31, 0);

        assert_eq!(run_trial(&sessions, &prefs, 3, 0, &mut rng), best);
    }
}

mod end_to_end {
    use super::common::*;
    use super::*;

    #[test]
    fn test_run_scheduler_writes_schedule() {
        let dir = scratch_dir("e2e");
        fs::create_dir_all(&dir).unwrap();
        let sessions_path = dir.join("sessions.txt");
        let prefs_path = dir.join("prefs.txt");
        let output_dir = dir.join("out");

        fs::write(
            &sessions_path,
            "Day\tTime Slot\nMonday\t09:00 AM - 10:00 AM\nMonday\t10:00 AM - 11:00 AM\nFriday\t02:00 PM - 03:00 PM\n",
        )
        .unwrap();
        fs::write(
            &prefs_path,
            "ID\tName\tDay\tTime Slot\n\
             gacu001\tUriel Garcilazo\tMonday\t09:00 AM - 10:00 AM\n\
             gacu001\tUriel Garcilazo\tMonday\t10:00 AM - 11:00 AM\n",
        )
        .unwrap();

        let path = run_scheduler(config(50, 5, 10, 1), &sessions_path, &prefs_path, &output_dir, false, true).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Monday\t09:00 AM - 10:00 AM\tgacu001\tUriel Garcilazo",
                "Monday\t10:00 AM - 11:00 AM\tgacu001\tUriel Garcilazo",
                "Friday\t02:00 PM - 03:00 PM\t\t",
            ]
        );
        assert!(output_dir.join("output_summary.json").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_bad_input_fails_before_writing() {
        let dir = scratch_dir("bad-input");
        fs::create_dir_all(&dir).unwrap();
        let sessions_path = dir.join("sessions.txt");
        let prefs_path = dir.join("prefs.txt");
        let output_dir = dir.join("out");

        fs::write(&sessions_path, "Day\tTime Slot\nMonday\tnine to ten\n").unwrap();
        fs::write(&prefs_path, "ID\tName\tDay\tTime Slot\n").unwrap();

        let result = run_scheduler(config(1, 1, 1, 1), &sessions_path, &prefs_path, &output_dir, false, false);

        assert!(result.is_err());
        assert!(!output_dir.exists());
        let _ = fs::remove_dir_all(&dir);
    }
}
