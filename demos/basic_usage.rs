use resrank::{CategoryFilter, RankOutcome, RankRequest, ResumeRanker, Submission};

const RESUMES: &str = "ID,Resume_str,Resume_html,Category
1,\"Python developer with sales experience\",<p/>,SALES
2,\"Sales manager, retail experience\",<p/>,SALES
3,\"Chef with culinary arts background\",<p/>,CHEF
4,\"HR generalist, recruiting and onboarding\",<p/>,HR
";

fn main() -> anyhow::Result<()> {
    println!("=== resrank Basic Usage Example ===\n");

    let ranker = ResumeRanker::default();

    // Example 1: rank the whole collection
    println!("--- Example 1: Rank all resumes for 'sales experience' ---");
    let outcome = ranker.rank_csv(RESUMES.as_bytes(), RankRequest::new("sales experience"))?;
    if let Some(ranking) = outcome.ranking() {
        for (i, doc) in ranking.top(10).iter().enumerate() {
            println!("{}. [Score: {:.4}] {} ({})", i + 1, doc.score, doc.id, doc.category);
        }
    }

    // Example 2: place an uploaded resume within one category
    println!("\n--- Example 2: Rank an uploaded resume within SALES ---");
    let request = RankRequest::new("sales experience")
        .with_categories(CategoryFilter::only(["sales"]))
        .submit(Submission::new("Seasoned sales lead.\nTen years of B2B sales experience."));

    match ranker.rank_csv(RESUMES.as_bytes(), request)? {
        RankOutcome::Ranked(ranking) => match ranking.focus {
            Some(p) => println!("Uploaded resume ranks {} with score {:.4}", p.rank, p.score),
            None => println!("Uploaded resume was not ranked"),
        },
        RankOutcome::NoDocuments => println!("No resumes found for the specified categories."),
    }

    // Example 3: a category with no resumes
    println!("\n--- Example 3: Unknown category ---");
    let request = RankRequest::new("pilot").with_categories(CategoryFilter::only(["AVIATION"]));
    let outcome = ranker.rank_csv(RESUMES.as_bytes(), request)?;
    println!("Has ranking: {}", outcome.ranking().is_some());

    Ok(())
}
