use bizgate::applications::{OpportunityScanner, ScanResponse, UserProfile};
use bizgate::config::AppConfig;
use bizgate::error::AppError;
use bizgate::feeds::{HttpFeedSource, NewsMode, NewsQuery, NewsResponse, NewsService};
use clap::Args;

#[derive(Args, Debug, Default)]
pub(crate) struct ScanArgs {
    /// Owner's full name
    #[arg(long, default_value = "")]
    pub(crate) user_name: String,
    /// Registered business name
    #[arg(long, default_value = "")]
    pub(crate) business_name: String,
    /// Taxpayer identification number (STIR)
    #[arg(long, default_value = "")]
    pub(crate) tin: String,
    /// Legal form, e.g. YTT or MCHJ
    #[arg(long, default_value = "")]
    pub(crate) legal_form: String,
    #[arg(long, default_value = "")]
    pub(crate) director_name: String,
    #[arg(long, default_value = "")]
    pub(crate) phone: String,
    #[arg(long, default_value = "")]
    pub(crate) email: String,
    #[arg(long, default_value = "")]
    pub(crate) address: String,
    #[arg(long, default_value = "")]
    pub(crate) region: String,
    /// Free-text activity description matched against programme keywords
    #[arg(long, default_value = "")]
    pub(crate) activity_type: String,
}

impl ScanArgs {
    fn profile(&self) -> UserProfile {
        UserProfile {
            user_name: self.user_name.clone(),
            business_name: self.business_name.clone(),
            tin: self.tin.clone(),
            legal_form: self.legal_form.clone(),
            director_name: self.director_name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            region: self.region.clone(),
            activity_type: self.activity_type.clone(),
            ..UserProfile::default()
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct NewsArgs {
    /// Maximum number of headlines to print (1-100)
    #[arg(long, default_value_t = 20)]
    pub(crate) limit: usize,
    /// Only keep items whose title or description contains this text
    #[arg(long)]
    pub(crate) query: Option<String>,
    /// Skip the entrepreneurship topic filter
    #[arg(long)]
    pub(crate) all: bool,
}

pub(crate) fn run_scan(args: ScanArgs) -> Result<(), AppError> {
    let response = OpportunityScanner::default().scan(&args.profile());
    render_scan(&response);
    Ok(())
}

fn render_scan(response: &ScanResponse) {
    println!("Opportunity scan ({} programmes)", response.total);
    for status in &response.items {
        let opportunity = &status.opportunity;
        let verdict = if status.eligible { "ELIGIBLE" } else { "PENDING" };
        println!(
            "- [{verdict}] {} | {} | deadline {}",
            opportunity.title, opportunity.platform, opportunity.deadline
        );
        if !status.eligible {
            println!("    reason: {}", status.reason.as_str());
        }
        if !status.missing_fields.is_empty() {
            println!("    missing: {}", status.missing_fields.join(", "));
        }
    }
}

pub(crate) async fn run_news(args: NewsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let query = NewsQuery {
        limit: args.limit,
        q: args.query,
        mode: if args.all {
            NewsMode::All
        } else {
            NewsMode::Entrepreneurship
        },
    };
    query.validate().map_err(AppError::InvalidRequest)?;

    let source = HttpFeedSource::new(&config.feed)?;
    let service = NewsService::new(source, &config.feed);
    let response = service.latest(&query).await?;
    render_news(&response);
    Ok(())
}

fn render_news(response: &NewsResponse) {
    println!(
        "{} | {} matching item(s), showing {}",
        response.source,
        response.total,
        response.items.len()
    );
    for item in &response.items {
        println!("- {} ({})", item.title, item.pub_date);
        println!("  {}", item.link);
    }
}
