use crate::services::registry::PortfolioRegistry;

/// Renders a plain-text summary of one portfolio: header, one line per
/// holding in insertion order, total value. Always returns a
/// display-ready string; a missing portfolio becomes a message rather
/// than an error, since the result is handed straight to a display layer.
pub fn portfolio_report(registry: &PortfolioRegistry, portfolio_name: &str) -> String {
    let Some(portfolio) = registry.get(portfolio_name) else {
        return format!("Portfolio '{portfolio_name}' does not exist.");
    };

    let mut lines = Vec::new();
    lines.push(format!("Report for Portfolio: {}", portfolio.name));
    lines.push("-".to_string());

    let mut total_value = 0.0;
    if portfolio.holdings().is_empty() {
        lines.push("No stocks in this portfolio.".to_string());
    } else {
        for holding in portfolio.holdings() {
            let value = holding.stock.price * holding.quantity as f64;
            total_value += value;
            lines.push(format!(
                "{} | {} | Qty: {} | Price: ${:.2} | Value: ${:.2}",
                holding.stock.symbol,
                holding.stock.name,
                holding.quantity,
                holding.stock.price,
                value
            ));
        }
    }

    lines.push("-".to_string());
    lines.push(format!("Total Portfolio Value: ${total_value:.2}"));
    lines.join("\n")
}
