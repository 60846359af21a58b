use vnquant_utils::industry::{IndustryClient, IndustryPage, IndustryQuery};
use vnquant_utils::{config, logger, Error};

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_logger()?;

    println!("Industry Classification Example");
    println!("===============================");

    let app_config = config::global();
    let client = IndustryClient::from_config(app_config)?;
    let query = IndustryQuery::from_config(app_config).with_code_list(["ASM", "AAA"]);

    println!("\n🔎 Query: {}", query.q_string());
    println!("{}", "-".repeat(40));

    match client.get_ind_class(&query).await {
        Ok(raw) => {
            let page = IndustryPage::from_value(&raw)?;
            println!("✅ Success! {} industries returned", page.data.len());

            for ticker in ["ASM", "AAA"] {
                for industry in page.industries_of(ticker) {
                    println!(
                        "🏭 {} → [{}] {} / {}",
                        ticker,
                        industry.industry_code.as_deref().unwrap_or("?"),
                        industry.english_name.as_deref().unwrap_or("-"),
                        industry.vietnamese_name.as_deref().unwrap_or("-"),
                    );
                }
            }
        }
        Err(e) => println!("❌ Failed to retrieve industry classification: {}", e),
    }

    Ok(())
}
