//! Message rendering
//!
//! Messages use the Telegram HTML subset: `<b>`, `<i>`, `<code>` and `<a>`.
//! Every piece of dynamic text goes through [`escape`].

use crate::alerts::{AlertRules, BoundaryMode, Notification};
use chrono::NaiveDateTime;
use std::fmt;

/// A rendered message body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    text: String,
}

impl Message {
    /// Markup as sent to the transport
    pub fn as_html(&self) -> &str {
        &self.text
    }

    /// Markup stripped and entities decoded, for terminals and logs
    pub fn plain_text(&self) -> String {
        let mut out = String::with_capacity(self.text.len());
        let mut in_tag = false;
        for c in self.text.chars() {
            match c {
                '<' => in_tag = true,
                '>' if in_tag => in_tag = false,
                _ if !in_tag => out.push(c),
                _ => {}
            }
        }
        out.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&amp;", "&")
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Incremental HTML message builder
#[derive(Debug, Default)]
pub struct MessageBuilder {
    text: String,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain text
    pub fn text(mut self, text: &str) -> Self {
        self.text.push_str(&escape(text));
        self
    }

    pub fn bold(mut self, text: &str) -> Self {
        self.text.push_str(&format!("<b>{}</b>", escape(text)));
        self
    }

    pub fn italic(mut self, text: &str) -> Self {
        self.text.push_str(&format!("<i>{}</i>", escape(text)));
        self
    }

    /// Inline code; used for every numeric value
    pub fn code(mut self, text: &str) -> Self {
        self.text.push_str(&format!("<code>{}</code>", escape(text)));
        self
    }

    pub fn link(mut self, label: &str, url: &str) -> Self {
        self.text
            .push_str(&format!("<a href=\"{}\">{}</a>", escape(url), escape(label)));
        self
    }

    pub fn newline(mut self) -> Self {
        self.text.push('\n');
        self
    }

    pub fn build(self) -> Message {
        Message { text: self.text }
    }
}

/// Escape the characters Telegram's HTML parser treats specially
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Format a price with thousands separators and two decimals
pub fn format_price(price: f64, vs_currency: &str) -> String {
    let grouped = group_thousands(price);
    if vs_currency.eq_ignore_ascii_case("usd") {
        format!("${}", grouped)
    } else {
        format!("{} {}", grouped, vs_currency.to_uppercase())
    }
}

fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac)
}

/// Renders notifications into messages
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    /// Asset label, e.g. "ETH"
    asset: String,
    /// Quote currency for prices, e.g. "usd"
    vs_currency: String,
    /// Reference chart linked from alerts and briefings
    chart_url: String,
    rules: AlertRules,
}

impl MessageFormatter {
    pub fn new(
        asset: impl Into<String>,
        vs_currency: impl Into<String>,
        chart_url: impl Into<String>,
        rules: AlertRules,
    ) -> Self {
        Self {
            asset: asset.into(),
            vs_currency: vs_currency.into(),
            chart_url: chart_url.into(),
            rules,
        }
    }

    /// Render a notification; `price` is the spot price when one was looked up
    pub fn render(
        &self,
        notification: &Notification,
        price: Option<f64>,
        now: NaiveDateTime,
    ) -> Message {
        match *notification {
            Notification::Startup => self.startup(),
            Notification::ConnectionRestored => MessageBuilder::new()
                .text("📡 ")
                .bold("Connection restored")
                .newline()
                .newline()
                .text("The monitor has resumed normal operation.")
                .build(),
            Notification::Briefing { volatility } => self.briefing(volatility, price, now),
            Notification::HighVolatility { volatility } => self.alert(volatility, price, true),
            Notification::LowVolatility { volatility } => self.alert(volatility, price, false),
            Notification::Recovered { volatility } => MessageBuilder::new()
                .text("✅ ")
                .bold("Volatility back in the normal range")
                .newline()
                .newline()
                .text("Current DVOL: ")
                .code(&format!("{:.2}", volatility))
                .build(),
        }
    }

    fn startup(&self) -> Message {
        let thresholds = &self.rules.thresholds;
        MessageBuilder::new()
            .text("✅ ")
            .bold(&format!("{} volatility monitor started", self.asset))
            .newline()
            .newline()
            .text("DVOL thresholds: ")
            .code(&format!("{:.2}", thresholds.low()))
            .text(" / ")
            .code(&format!("{:.2}", thresholds.high()))
            .text(&format!(" ({})", thresholds.boundary()))
            .newline()
            .text("Daily briefing at ")
            .code(&self.rules.briefing_hour.to_string())
            .build()
    }

    fn briefing(&self, volatility: f64, price: Option<f64>, now: NaiveDateTime) -> Message {
        MessageBuilder::new()
            .text("☀️ ")
            .bold(&format!("{} daily briefing", self.asset))
            .newline()
            .italic(&now.format("%Y-%m-%d %H:%M").to_string())
            .newline()
            .newline()
            .text("📈 ")
            .bold(&format!("{} price:", self.asset))
            .text(" ")
            .code(&self.price_text(price))
            .newline()
            .text("📊 ")
            .bold("Current DVOL:")
            .text(" ")
            .code(&format!("{:.2}", volatility))
            .newline()
            .newline()
            .text("👇 ")
            .bold("Check the official IV rank/percentile:")
            .newline()
            .link("Deribit chart", &self.chart_url)
            .build()
    }

    fn alert(&self, volatility: f64, price: Option<f64>, high: bool) -> Message {
        let thresholds = &self.rules.thresholds;
        let inclusive = thresholds.boundary() == BoundaryMode::Inclusive;
        let (icon, title, relation, threshold, mood, strategy) = if high {
            (
                "🚨 ",
                "High volatility alert",
                if inclusive { "at or above" } else { "above" },
                thresholds.high(),
                "Sentiment may be turning fearful; consider ",
                "premium-selling strategies",
            )
        } else {
            (
                "📉 ",
                "Low volatility alert",
                if inclusive { "at or below" } else { "below" },
                thresholds.low(),
                "Sentiment may be turning complacent; consider ",
                "premium-buying strategies",
            )
        };

        MessageBuilder::new()
            .text(icon)
            .bold(title)
            .newline()
            .newline()
            .text("📊 ")
            .bold("DVOL is at")
            .text(" ")
            .code(&format!("{:.2}", volatility))
            .newline()
            .text(&format!("({} your {} threshold)", relation, threshold))
            .newline()
            .newline()
            .text("💲 ")
            .bold(&format!("{} price:", self.asset))
            .text(" ")
            .code(&self.price_text(price))
            .newline()
            .newline()
            .text(mood)
            .bold(strategy)
            .text(".")
            .newline()
            .text("👇 ")
            .bold("Verify the official IV rank/percentile:")
            .newline()
            .link("Deribit chart", &self.chart_url)
            .build()
    }

    fn price_text(&self, price: Option<f64>) -> String {
        price
            .map(|p| format_price(p, &self.vs_currency))
            .unwrap_or_else(|| "unavailable".to_string())
    }
}
