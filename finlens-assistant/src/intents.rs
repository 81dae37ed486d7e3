//! Local answers for finance questions.
//!
//! A fixed, ordered table of (predicate, handler) rules evaluated top to
//! bottom; the first predicate that matches answers the question. Matching is
//! case-insensitive regex over the raw question text. The last rule matches
//! everything, so every question gets an answer.

use chrono::{Datelike, Local, NaiveDate};
use finlens_core::filter::{sum_by_type, sum_in_month};
use finlens_core::period::MONTH_NAMES;
use finlens_core::{format_money, Transaction, TransactionType, YearMonth};
use regex::Regex;
use serde::Serialize;

pub const DEFINITION_TEXT: &str = "Finance is the management of money and other assets. It involves activities such as saving, investing, borrowing, budgeting, and planning for future expenses. Finance helps individuals and organizations make informed decisions about how to use resources to achieve their goals.";

pub const SAVINGS_TEXT: &str = "To improve your savings and manage income better: 1) Track all expenses, 2) Set a monthly budget, 3) Prioritize essential spending, 4) Use the 50/30/20 rule: 50% needs, 30% wants, 20% savings. Start by saving 10-20% of your income first.";

pub const INVESTMENT_TEXT: &str = "Start with emergency funds (3-6 months expenses), then consider low-risk options like mutual funds, government bonds, or index funds. Always research and never invest more than you can afford to lose. Consider starting with SIP (Systematic Investment Plans).";

pub const DEBT_TEXT: &str = "Focus on high-interest debt first (credit cards, personal loans). Consider debt consolidation if you have multiple loans. Always pay more than minimum payments when possible. Create a debt payoff plan and stick to it.";

pub const GREETING_TEXT: &str = "Hello! I'm your finance assistant. I can help you understand your spending patterns, calculate balances, and provide general financial advice. What would you like to know?";

pub const HELP_TEXT: &str = "I can help you with: checking your balance, calculating income/expenses, budgeting tips, investment advice, debt management, and general financial guidance. Just ask!";

pub const DEFAULT_TEXT: &str = "I can help you track your finances and provide general financial advice. Try asking about your balance, income, expenses, savings, investments, or general money management tips.";

const MONTH_PATTERN: &str =
    r"\b(january|february|march|april|may|june|july|august|september|october|november|december)\b";

/// Which rule answered, in table order
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Definition,
    MonthlyTotals,
    Balance,
    TotalByType,
    Savings,
    Investment,
    Debt,
    Greeting,
    Help,
    Expenses,
    Income,
    Default,
}

/// Everything a handler may look at
#[derive(Debug, Clone, Copy)]
pub struct Query<'a> {
    pub question: &'a str,
    pub transactions: &'a [Transaction],
    /// Supplies the year when a month is named without one
    pub today: NaiveDate,
}

type Predicate = Box<dyn Fn(&str) -> bool + Send + Sync>;
type Handler = Box<dyn Fn(&Query<'_>) -> String + Send + Sync>;

pub struct IntentRule {
    pub intent: Intent,
    predicate: Predicate,
    handler: Handler,
}

impl IntentRule {
    fn new(intent: Intent, predicate: Predicate, handler: Handler) -> Self {
        Self {
            intent,
            predicate,
            handler,
        }
    }

    pub fn matches(&self, question: &str) -> bool {
        (self.predicate)(question)
    }

    pub fn answer(&self, query: &Query<'_>) -> String {
        (self.handler)(query)
    }
}

impl std::fmt::Debug for IntentRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentRule").field("intent", &self.intent).finish()
    }
}

/// The answer plus the rule that produced it
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Resolution {
    pub intent: Intent,
    /// Position of the rule in the table
    pub rule_index: usize,
    pub answer: String,
}

#[derive(Debug)]
pub struct IntentResolver {
    rules: Vec<IntentRule>,
}

fn ci(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("(?i){pattern}"))
}

fn keywords(pattern: &str) -> Result<Predicate, regex::Error> {
    let re = ci(pattern)?;
    Ok(Box::new(move |q: &str| re.is_match(q)))
}

fn fixed(text: &'static str) -> Handler {
    Box::new(move |_: &Query<'_>| text.to_string())
}

impl IntentResolver {
    pub fn new() -> Result<Self, regex::Error> {
        let definition = ci(r"^(what is|define|explain) finance\??$")?;
        let month = ci(MONTH_PATTERN)?;
        let month_topic = ci("income|expense|spent|balance")?;
        let monthly = MonthlyTotals {
            month: month.clone(),
            year: Regex::new(r"\b(\d{4})\b")?,
            income: ci("income")?,
            expense: ci("expense|spent")?,
        };
        let total_income = ci("total income")?;

        let rules = vec![
            IntentRule::new(
                Intent::Definition,
                Box::new(move |q: &str| definition.is_match(q.trim())),
                fixed(DEFINITION_TEXT),
            ),
            IntentRule::new(
                Intent::MonthlyTotals,
                Box::new(move |q: &str| month.is_match(q) && month_topic.is_match(q)),
                Box::new(move |q: &Query<'_>| monthly.answer(q)),
            ),
            IntentRule::new(
                Intent::Balance,
                keywords("balance")?,
                Box::new(balance_answer),
            ),
            IntentRule::new(
                Intent::TotalByType,
                keywords("total income|total expense|total spent")?,
                Box::new(move |q: &Query<'_>| {
                    if total_income.is_match(q.question) {
                        format!("Your total income is {}.", money(q, TransactionType::Income))
                    } else {
                        format!("Your total expenses are {}.", money(q, TransactionType::Expense))
                    }
                }),
            ),
            IntentRule::new(
                Intent::Savings,
                keywords("savings|save|budget|income management|money management")?,
                fixed(SAVINGS_TEXT),
            ),
            IntentRule::new(
                Intent::Investment,
                keywords("investment|invest|grow money|wealth building")?,
                fixed(INVESTMENT_TEXT),
            ),
            IntentRule::new(Intent::Debt, keywords("debt|loan|credit|borrow")?, fixed(DEBT_TEXT)),
            IntentRule::new(Intent::Greeting, keywords(r"\b(hi|hello|hey)\b")?, fixed(GREETING_TEXT)),
            IntentRule::new(
                Intent::Help,
                keywords("help|what can you do|capabilities")?,
                fixed(HELP_TEXT),
            ),
            IntentRule::new(
                Intent::Expenses,
                keywords("expense|spending|cost")?,
                Box::new(|q: &Query<'_>| {
                    format!(
                        "Your total expenses are {}. To reduce expenses: track spending, identify non-essential items, negotiate bills, and look for cheaper alternatives.",
                        money(q, TransactionType::Expense)
                    )
                }),
            ),
            IntentRule::new(
                Intent::Income,
                keywords("income|earn|salary")?,
                Box::new(|q: &Query<'_>| {
                    format!(
                        "Your total income is {}. To increase income: ask for raises, develop new skills, take on side projects, or explore passive income opportunities.",
                        money(q, TransactionType::Income)
                    )
                }),
            ),
            IntentRule::new(Intent::Default, Box::new(|_: &str| true), fixed(DEFAULT_TEXT)),
        ];

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    pub fn rule(&self, intent: Intent) -> Option<&IntentRule> {
        self.rules.iter().find(|r| r.intent == intent)
    }

    /// First matching rule for the question.
    pub fn classify(&self, question: &str) -> (usize, &IntentRule) {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, r)| r.matches(question))
            // the table ends with a catch-all
            .unwrap_or((self.rules.len() - 1, &self.rules[self.rules.len() - 1]))
    }

    /// Resolve against today's local date.
    pub fn resolve(&self, question: &str, transactions: &[Transaction]) -> Resolution {
        self.resolve_at(question, transactions, Local::now().date_naive())
    }

    pub fn resolve_at(
        &self,
        question: &str,
        transactions: &[Transaction],
        today: NaiveDate,
    ) -> Resolution {
        let (rule_index, rule) = self.classify(question);
        tracing::debug!(intent = ?rule.intent, rule_index, "matched intent rule");
        let query = Query {
            question,
            transactions,
            today,
        };
        Resolution {
            intent: rule.intent,
            rule_index,
            answer: rule.answer(&query),
        }
    }
}

fn money(q: &Query<'_>, kind: TransactionType) -> String {
    format_money(sum_by_type(q.transactions, kind))
}

fn balance_answer(q: &Query<'_>) -> String {
    let income = sum_by_type(q.transactions, TransactionType::Income);
    let expense = sum_by_type(q.transactions, TransactionType::Expense);
    format!(
        "Your current balance is {}. Total income: {}, Total expenses: {}.",
        format_money(income - expense),
        format_money(income),
        format_money(expense)
    )
}

/// Month-scoped totals: "income in March", "spent in May 2023", "balance in June".
struct MonthlyTotals {
    month: Regex,
    year: Regex,
    income: Regex,
    expense: Regex,
}

impl MonthlyTotals {
    fn period(&self, q: &Query<'_>) -> Option<YearMonth> {
        let name = self.month.captures(q.question)?.get(1)?.as_str().to_lowercase();
        let idx = MONTH_NAMES.iter().position(|m| m.to_lowercase() == name)?;
        let year = self
            .year
            .captures(q.question)
            .and_then(|c| c[1].parse::<i32>().ok())
            .unwrap_or_else(|| q.today.year());
        YearMonth::new(year, idx as u32 + 1)
    }

    fn answer(&self, q: &Query<'_>) -> String {
        let Some(period) = self.period(q) else {
            return DEFAULT_TEXT.to_string();
        };
        let income = sum_in_month(q.transactions, TransactionType::Income, period);
        let expense = sum_in_month(q.transactions, TransactionType::Expense, period);

        if self.income.is_match(q.question) {
            format!("Your income for {period} is {}.", format_money(income))
        } else if self.expense.is_match(q.question) {
            format!("Your expenses for {period} are {}.", format_money(expense))
        } else {
            format!(
                "Your balance for {period} is {}. Income: {}, Expenses: {}.",
                format_money(income - expense),
                format_money(income),
                format_money(expense)
            )
        }
    }
}
