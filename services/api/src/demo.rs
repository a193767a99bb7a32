use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use clap::Args;
use salescomp::commissions::{
    BulkIngestionProcessor, CommissionEngine, CommissionError, MonthRef, Region, RegionAssignment,
    SaleCategory, SaleDraft, SaleId, SaleRecord, Target, User, UserId, UserStatus,
};
use salescomp::error::AppError;

use crate::infra::{
    default_commission_config, InMemorySaleStore, InMemoryTargetStore, InMemoryUserDirectory,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Month to report on (1-12). Defaults to the seeded December dataset.
    #[arg(long, default_value_t = 12)]
    pub(crate) month: u32,
    /// Year to report on.
    #[arg(long, default_value_t = 2024)]
    pub(crate) year: i32,
}

#[derive(Args, Debug)]
pub(crate) struct CommissionArgs {
    /// Email of the seeded salesperson to report on
    #[arg(long)]
    pub(crate) email: String,
    /// Month to report on (1-12)
    #[arg(long)]
    pub(crate) month: u32,
    /// Year to report on
    #[arg(long)]
    pub(crate) year: i32,
}

fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("seed dates are valid")
}

struct SeedPerson {
    name: &'static str,
    email: &'static str,
    region: Region,
    hired: DateTime<Utc>,
    december_target: f64,
    december_sales: [(f64, u32, SaleCategory); 4],
    november_target: f64,
    november_sale: (f64, u32),
}

fn sample_people() -> Vec<SeedPerson> {
    use SaleCategory::{Consulting, Hardware, Software, Support};
    vec![
        SeedPerson {
            name: "Alice Johnson",
            email: "alice@company.com",
            region: Region::North,
            hired: day(2024, 1, 15),
            december_target: 20_000.0,
            december_sales: [
                (5_000.0, 1, Software),
                (3_000.0, 5, Hardware),
                (8_000.0, 10, Consulting),
                (4_000.0, 15, Support),
            ],
            november_target: 18_000.0,
            november_sale: (19_000.0, 15),
        },
        SeedPerson {
            name: "Bob Chen",
            email: "bob@company.com",
            region: Region::South,
            hired: day(2024, 3, 1),
            december_target: 15_000.0,
            december_sales: [
                (2_500.0, 2, Software),
                (4_500.0, 8, Hardware),
                (6_000.0, 12, Consulting),
                (2_000.0, 18, Support),
            ],
            november_target: 12_000.0,
            november_sale: (13_000.0, 20),
        },
        SeedPerson {
            name: "Carol Williams",
            email: "carol@company.com",
            region: Region::East,
            hired: day(2024, 2, 10),
            december_target: 18_000.0,
            december_sales: [
                (3_500.0, 3, Software),
                (5_500.0, 7, Hardware),
                (7_000.0, 14, Consulting),
                (2_000.0, 20, Support),
            ],
            november_target: 15_000.0,
            november_sale: (16_000.0, 25),
        },
        SeedPerson {
            name: "David Brown",
            email: "david@company.com",
            region: Region::West,
            hired: day(2024, 4, 5),
            december_target: 22_000.0,
            december_sales: [
                (4_000.0, 4, Software),
                (6_000.0, 9, Hardware),
                (8_000.0, 16, Consulting),
                (4_000.0, 22, Support),
            ],
            november_target: 20_000.0,
            november_sale: (21_000.0, 30),
        },
    ]
}

/// Load the sample dataset: four salespeople across the four regions with
/// December sales and targets, plus November targets the November sales hit
/// so the streak bonus has history to walk.
pub(crate) fn seed_sample_data(
    users: &InMemoryUserDirectory,
    sales: &InMemorySaleStore,
    targets: &InMemoryTargetStore,
) -> Vec<User> {
    let mut seeded = Vec::new();
    let mut sale_sequence = 0u32;

    for (index, person) in sample_people().into_iter().enumerate() {
        let user_id = UserId(format!("seed-user-{:03}", index + 1));
        let user = users.add(User {
            id: user_id.clone(),
            name: person.name.to_string(),
            email: person.email.to_string(),
            region: person.region,
            hire_date: person.hired,
            status: UserStatus::Active,
            region_start_date: person.hired,
            region_history: vec![RegionAssignment {
                region: person.region,
                effective_from: person.hired,
            }],
        });

        targets.set(Target {
            user_id: user_id.clone(),
            month: 12,
            year: 2024,
            amount: person.december_target,
        });
        targets.set(Target {
            user_id: user_id.clone(),
            month: 11,
            year: 2024,
            amount: person.november_target,
        });

        for (amount, day_of_month, category) in person.december_sales {
            sale_sequence += 1;
            sales.add(SaleRecord {
                id: SaleId(format!("seed-sale-{sale_sequence:03}")),
                user_id: user_id.clone(),
                amount,
                date: day(2024, 12, day_of_month),
                category,
                commission_rate: 5.0,
            });
        }

        let (november_amount, november_day) = person.november_sale;
        sale_sequence += 1;
        sales.add(SaleRecord {
            id: SaleId(format!("seed-sale-{sale_sequence:03}")),
            user_id: user_id.clone(),
            amount: november_amount,
            date: day(2024, 11, november_day),
            category: SaleCategory::Software,
            commission_rate: 5.0,
        });

        seeded.push(user);
    }

    seeded
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let Some(month) = MonthRef::new(args.month, args.year) else {
        println!("Month must be between 1 and 12");
        return Ok(());
    };

    let users = Arc::new(InMemoryUserDirectory::default());
    let sales = Arc::new(InMemorySaleStore::default());
    let targets = Arc::new(InMemoryTargetStore::default());
    let seeded = seed_sample_data(&users, &sales, &targets);

    let config = default_commission_config();
    let default_rate = config.default_sale_commission_rate;
    let engine = CommissionEngine::new(users.clone(), sales.clone(), targets.clone(), config);

    println!("Sales commission demo for {month}");
    for user in &seeded {
        let result = engine.calculate_commission(&user.id, month).await?;
        println!("- {} ({})", user.name, user.region.label());
        println!(
            "  sales {:.2} | base {:.2} | tier bonus {:.2} | multiplier {:.2}",
            result.total_sales, result.base_commission, result.tier_bonus, result.regional_multiplier
        );
        println!(
            "  streak {:.2} | penalty {:.2} | total {:.2} | target hit: {}",
            result.streak_bonus,
            result.performance_penalty,
            result.total_commission,
            result.target_hit
        );
        for segment in &result.region_transfers {
            println!(
                "  transfer segment: {} | sales {:.2} | {} days | commission {:.2}",
                segment.region.label(),
                segment.sales,
                segment.days,
                segment.commission
            );
        }
    }

    println!("\nBulk ingestion demo");
    let ingestion = BulkIngestionProcessor::new(users.clone(), sales.clone(), default_rate);
    let drafts = vec![
        SaleDraft {
            user_id: seeded[0].id.clone(),
            amount: 1_250.0,
            date: day(2024, 12, 28),
            category: SaleCategory::Software,
            commission_rate: None,
        },
        SaleDraft {
            user_id: UserId("user-999999".to_string()),
            amount: 900.0,
            date: day(2024, 12, 28),
            category: SaleCategory::Support,
            commission_rate: Some(7.5),
        },
        SaleDraft {
            user_id: seeded[0].id.clone(),
            amount: 5_000.0,
            date: day(2024, 12, 1),
            category: SaleCategory::Software,
            commission_rate: None,
        },
    ];
    let batch_size = drafts.len();
    let outcome = ingestion
        .process(drafts)
        .await
        .map_err(CommissionError::from)?;
    println!("- admitted {} of {} drafts", outcome.success_count, batch_size);
    for error in &outcome.errors {
        println!("  - draft {} rejected: {}", error.index, error.error);
    }

    Ok(())
}

pub(crate) async fn run_commission(args: CommissionArgs) -> Result<(), AppError> {
    let Some(month) = MonthRef::new(args.month, args.year) else {
        println!("Month must be between 1 and 12");
        return Ok(());
    };

    let users = Arc::new(InMemoryUserDirectory::default());
    let sales = Arc::new(InMemorySaleStore::default());
    let targets = Arc::new(InMemoryTargetStore::default());
    seed_sample_data(&users, &sales, &targets);

    let Some(user) = users.find_by_email(&args.email) else {
        println!("No seeded salesperson has email {}", args.email);
        return Ok(());
    };

    let engine = CommissionEngine::new(users, sales, targets, default_commission_config());
    let result = engine.calculate_commission(&user.id, month).await?;
    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("commission payload unavailable: {err}"),
    }

    Ok(())
}
