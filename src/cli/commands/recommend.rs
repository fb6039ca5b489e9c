use crate::clients::CatalogClient;
use crate::config::Config;
use crate::domain::TitleKind;
use crate::recommender::{Recommender, Rule};

pub struct RecommendArgs {
    pub rule: Rule,
    pub kinds: Vec<TitleKind>,
    pub user_id: String,
    pub submit: bool,
}

pub async fn cmd_recommend(config: &Config, args: RecommendArgs) -> anyhow::Result<()> {
    if args.rule.count == 0 {
        anyhow::bail!("--count must be at least 1");
    }

    let client = CatalogClient::new(&config.client)?;
    let recommender = Recommender::new(client, args.rule.clone());

    println!(
        "Picking {} '{}' titles with IMDb score >= {} from {}",
        args.rule.count, args.rule.genre, args.rule.min_score, config.client.base_url
    );

    let picks = recommender.recommend(&args.kinds).await?;
    if picks.is_empty() {
        println!("No titles match.");
        return Ok(());
    }

    println!("{:-<70}", "");
    for (i, pick) in picks.iter().enumerate() {
        println!(
            "{:>2}. [{}] {} ({}) - {:.1}  {}",
            i + 1,
            pick.title.kind,
            pick.title.title,
            pick.title.release_year,
            pick.score,
            pick.title.source_id
        );
    }

    if args.submit {
        let report = recommender.submit(&args.user_id, &picks).await;
        println!();
        println!(
            "Recorded {} predictions for '{}'.",
            report.submitted.len(),
            args.user_id
        );
        for (title_ref, err) in &report.failed {
            println!("  failed {title_ref}: {err}");
        }
    }

    Ok(())
}
