use milp_api_sdk::{Figures, ProblemType, Report, SolverClient, SolverDirection, SubmissionBuilder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Create a client (adjust URL as needed)
    let client = SolverClient::new("http://127.0.0.1:8080")?;

    // Cell tower coverage: choose towers to build within a budget so that
    // the covered population is as large as possible.
    let payload = SubmissionBuilder::new(ProblemType::LocationAnalysis)
        .add_parameter("budget", "20")
        .add_variable("build_Tower")
        .add_variable("iscovered_Region")
        .add_constraint("sum(Cost_t * build_t) <= budget")
        .objective("sum(Population_r * iscovered_r)", Some(SolverDirection::Maximize))
        .build()?;

    println!("\n📊 Submitting location analysis problem...\n");

    let solution = client.solve(payload).await?;

    match solution.result {
        Some(Report::Text(text)) => println!("{}", text),
        Some(Report::Table(records)) => {
            for record in records {
                println!("{:?}", record);
            }
        }
        Some(Report::Unrecognized(value)) => println!("Unrecognized result: {}", value),
        None => println!("No result returned"),
    }

    match solution.fig {
        Some(Figures::Single(_)) => println!("✓ Received 1 figure"),
        Some(Figures::Many(images)) => println!("✓ Received {} figures", images.len()),
        _ => {}
    }

    Ok(())
}
