use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use launch_ledger::dataset::Dataset;
use launch_ledger::models::*;
use launch_ledger::query::{QueryEngine, QueryError};
use speculate2::speculate;

fn fixture_engine() -> QueryEngine {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/space_missions.csv");
    let dataset = Dataset::load(path).expect("Failed to load fixture dataset");
    QueryEngine::new(Arc::new(dataset))
}

fn record(company: &str, date: &str, mission: &str, rocket: &str, status: &str) -> MissionRecord {
    MissionRecord {
        company: company.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .expect("Invalid test date")
            .and_hms_opt(0, 0, 0)
            .expect("Invalid test time"),
        mission: mission.to_string(),
        rocket: rocket.to_string(),
        mission_status: MissionStatus::from_raw(status),
    }
}

fn engine_from(records: Vec<MissionRecord>) -> QueryEngine {
    QueryEngine::new(Arc::new(Dataset::from_records(records)))
}

speculate! {
    before {
        let engine = fixture_engine();
    }

    describe "top_companies_by_mission_count" {
        it "returns nothing for n = 0" {
            assert!(engine.top_companies_by_mission_count(0).is_empty());
        }

        it "ranks by count and breaks ties by first appearance" {
            let top = engine.top_companies_by_mission_count(3);
            assert_eq!(top, vec![
                CompanyCount::new("US Navy", 4),
                CompanyCount::new("RVSN USSR", 3),
                CompanyCount::new("AMBA", 3),
            ]);
        }

        it "returns every company when n exceeds the distinct count" {
            let top = engine.top_companies_by_mission_count(100);
            assert_eq!(top.len(), 5);
            assert!(top.windows(2).all(|w| w[0].missions >= w[1].missions));
            assert_eq!(top[3].company, "CASC");
            assert_eq!(top[4].company, "US Air Force");
        }

        it "picks the larger company from a two-company dataset" {
            let mut records = Vec::new();
            for i in 0..5 {
                records.push(record("A", "2000-01-01", &format!("A-{}", i), "R", "Success"));
            }
            for i in 0..3 {
                records.push(record("B", "2000-01-01", &format!("B-{}", i), "R", "Success"));
            }
            let engine = engine_from(records);
            assert_eq!(engine.top_companies_by_mission_count(1), vec![CompanyCount::new("A", 5)]);
        }

        it "returns nothing on an empty dataset" {
            assert!(engine_from(Vec::new()).top_companies_by_mission_count(3).is_empty());
        }
    }

    describe "mission_count_by_company" {
        it "counts a known company" {
            assert_eq!(engine.mission_count_by_company("US Navy"), 4);
            assert_eq!(engine.mission_count_by_company("CASC"), 1);
        }

        it "returns 0 for an unknown company" {
            assert_eq!(engine.mission_count_by_company("Blue Origin"), 0);
        }

        it "is case sensitive" {
            assert_eq!(engine.mission_count_by_company("casc"), 0);
        }
    }

    describe "success_rate" {
        it "rounds to two decimals" {
            assert_eq!(engine.success_rate("AMBA"), 0.67);
            assert_eq!(engine.success_rate("US Navy"), 0.25);
            assert_eq!(engine.success_rate("CASC"), 1.0);
        }

        it "returns 0.0 for an unknown company" {
            assert_eq!(engine.success_rate("Blue Origin"), 0.0);
        }

        it "counts partial failures as unsuccessful" {
            assert_eq!(engine.success_rate("US Air Force"), 0.0);
        }

        it "rounds exact halves to even" {
            let records: Vec<_> = (0..8)
                .map(|i| {
                    let status = if i == 0 { "Success" } else { "Failure" };
                    record("X", "2000-01-01", "M", "R", status)
                })
                .collect();
            assert_eq!(engine_from(records).success_rate("X"), 0.12);
        }

        it "rounds from the stored value of the ratio" {
            let rate_of = |successes: usize, total: usize| {
                let records: Vec<_> = (0..total)
                    .map(|i| {
                        let status = if i < successes { "Success" } else { "Failure" };
                        record("X", "2000-01-01", "M", "R", status)
                    })
                    .collect();
                engine_from(records).success_rate("X")
            };
            assert_eq!(rate_of(1, 40), 0.03);
            assert_eq!(rate_of(3, 40), 0.07);
        }
    }

    describe "missions_by_date_range" {
        it "includes both bounds" {
            assert_eq!(engine.missions_by_date_range("1957-10-04", "1957-10-04"), vec!["Sputnik-1"]);
            assert_eq!(
                engine.missions_by_date_range("1958-02-01", "1958-02-05"),
                vec!["Explorer 1", "Vanguard TV3BU"]
            );
        }

        it "returns missions in source order" {
            let missions = engine.missions_by_date_range("1960-01-01", "1970-12-31");
            assert_eq!(missions, vec!["Dong Fang Hong 01", "Midas-1"]);
        }

        it "returns an empty list for a malformed bound" {
            assert!(engine.missions_by_date_range("1957-10-04", "not-a-date").is_empty());
            assert!(engine.missions_by_date_range("twentyfifteen", "1970-01-01").is_empty());
        }

        it "does not accept partial dates as bounds" {
            assert!(engine.missions_by_date_range("1957", "1958").is_empty());
            assert!(engine.missions_by_date_range("1957-10", "1957-12").is_empty());
        }

        it "returns an empty list for an inverted range" {
            assert!(engine.missions_by_date_range("1970-01-01", "1957-01-01").is_empty());
        }

        it "names the bad bound in strict mode" {
            assert_eq!(
                engine.try_missions_by_date_range("1957-10-04", "not-a-date"),
                Err(QueryError::InvalidDate("not-a-date".to_string()))
            );
        }
    }

    describe "mission_status_count" {
        it "counts each recognized status" {
            let counts = engine.mission_status_count();
            assert_eq!(counts.successful, 6);
            assert_eq!(counts.failed, 5);
            assert_eq!(counts.partial_failure, 1);
            assert_eq!(counts.prelaunch_failure, 0);
            assert_eq!(counts.total(), engine.records().len());
        }

        it "skips unrecognized statuses" {
            let engine = engine_from(vec![
                record("A", "2000-01-01", "M1", "R", "Success"),
                record("A", "2000-01-02", "M2", "R", "Prelaunch Failure"),
                record("A", "2000-01-03", "M3", "R", "Scrubbed"),
            ]);
            let counts = engine.mission_status_count();
            assert_eq!(counts.successful, 1);
            assert_eq!(counts.prelaunch_failure, 1);
            assert_eq!(counts.total(), 2);
            assert!(counts.total() < engine.records().len());
        }

        it "lists labels in display order" {
            let labels: Vec<&str> = engine.mission_status_count().entries().iter().map(|(l, _)| *l).collect();
            assert_eq!(labels, vec!["Successful", "Failed", "Partial Failure", "Prelaunch Failure"]);
        }
    }

    describe "missions_by_year" {
        it "counts launches in a year" {
            assert_eq!(engine.missions_by_year(1957), 3);
            assert_eq!(engine.missions_by_year(1958), 7);
            assert_eq!(engine.missions_by_year(1959), 0);
        }

        it "sums to the record count across the dataset's years" {
            let span = engine.year_span().expect("Fixture has records");
            let total: usize = (span.first..=span.last).map(|y| engine.missions_by_year(y)).sum();
            assert_eq!(total, engine.records().len());
        }

        it "handles the single-record scenario" {
            let engine = engine_from(vec![record("CASC", "1957-10-04", "Lone Launch", "R", "Success")]);
            assert_eq!(engine.mission_count_by_company("CASC"), 1);
            assert_eq!(engine.success_rate("CASC"), 1.0);
            assert_eq!(engine.missions_by_year(1957), 1);
            assert_eq!(engine.missions_by_date_range("1957-10-04", "1957-10-04"), vec!["Lone Launch"]);
        }
    }

    describe "missions_per_year" {
        it "covers every year between the first and last launch" {
            let series = engine.missions_per_year();
            assert_eq!(series.len(), 14);
            assert_eq!(series[0], YearCount { year: 1957, missions: 3 });
            assert_eq!(series[2], YearCount { year: 1959, missions: 0 });
            assert_eq!(series[13], YearCount { year: 1970, missions: 1 });
            assert_eq!(series.iter().map(|y| y.missions).sum::<usize>(), 12);
        }

        it "is empty for an empty dataset" {
            assert!(engine_from(Vec::new()).missions_per_year().is_empty());
        }
    }

    describe "average_missions_per_year" {
        it "divides by the full year span" {
            assert_eq!(engine.average_missions_per_year(1957, 1958), 5.0);
            assert_eq!(engine.average_missions_per_year(1957, 1960), 2.75);
            assert_eq!(engine.average_missions_per_year(1957, 1970), 0.86);
        }

        it "averages a single year to its count" {
            assert_eq!(engine.average_missions_per_year(1958, 1958), 7.0);
        }

        it "returns 0.0 for an inverted range" {
            assert_eq!(engine.average_missions_per_year(2023, 1957), 0.0);
        }

        it "rounds from the stored value of the average" {
            let records: Vec<_> = (0..43)
                .map(|i| record("A", "2000-01-01", &format!("M-{}", i), "R", "Success"))
                .collect();
            assert_eq!(engine_from(records).average_missions_per_year(1981, 2020), 1.07);
        }

        it "returns 0.0 for a range without launches" {
            assert_eq!(engine.average_missions_per_year(2000, 2010), 0.0);
        }
    }

    describe "most_used_rocket" {
        it "returns the rocket with the most missions" {
            assert_eq!(engine.most_used_rocket(), Ok("Vanguard".to_string()));
            assert_eq!(
                engine.most_used_rocket_usage(),
                Ok(RocketUsage { rocket: "Vanguard".to_string(), missions: 4 })
            );
        }

        it "breaks ties by first appearance" {
            let engine = engine_from(vec![
                record("A", "2000-01-01", "M1", "Soyuz", "Success"),
                record("A", "2000-01-02", "M2", "Ariane", "Success"),
                record("A", "2000-01-03", "M3", "Ariane", "Success"),
                record("A", "2000-01-04", "M4", "Soyuz", "Success"),
            ]);
            assert_eq!(engine.most_used_rocket(), Ok("Soyuz".to_string()));
        }

        it "fails on an empty dataset" {
            assert_eq!(engine_from(Vec::new()).most_used_rocket(), Err(QueryError::EmptyDataset));
        }

        it "counts usage of any rocket" {
            assert_eq!(engine.rocket_usage("Juno I"), 3);
            assert_eq!(engine.rocket_usage("Saturn V"), 0);
        }
    }

    describe "companies" {
        it "lists distinct companies alphabetically" {
            assert_eq!(
                engine.companies(),
                vec!["AMBA", "CASC", "RVSN USSR", "US Air Force", "US Navy"]
            );
        }

        it "summarizes a company" {
            let summary = engine.company_summary("RVSN USSR");
            assert_eq!(summary.missions, 3);
            assert_eq!(summary.success_rate, 0.67);
        }
    }

    describe "date_span" {
        it "finds the earliest and latest launch regardless of file order" {
            let span = engine.date_span().expect("Fixture has records");
            assert_eq!(span.first.to_string(), "1957-10-04 00:00:00");
            assert_eq!(span.last.to_string(), "1970-04-24 00:00:00");
            assert_eq!(engine.year_span(), Some(YearSpan { first: 1957, last: 1970 }));
        }

        it "is None for an empty dataset" {
            assert!(engine_from(Vec::new()).date_span().is_none());
            assert!(engine_from(Vec::new()).year_span().is_none());
        }
    }
}
