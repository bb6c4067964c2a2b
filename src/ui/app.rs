use crate::aggregate::{
    categories_present, expenses_in_month, filter_and_sort_expenses, CategoryFilter, SortState,
};
use crate::ledger::{BudgetEditor, ExpenseDraft, Ledger};
use crate::models::{Expense, ExpenseCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Expenses,
    AddExpense,
    Budgets,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[
            Self::Dashboard,
            Self::Expenses,
            Self::AddExpense,
            Self::Budgets,
        ]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Expenses => write!(f, "Expenses"),
            Self::AddExpense => write!(f, "Add"),
            Self::Budgets => write!(f, "Budgets"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Search,
    Editing,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
            Self::Editing => write!(f, "EDIT"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PendingAction {
    DeleteExpense { id: String, name: String },
    QuitDiscardingBudgets,
}

/// Rows of the add-expense form, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormField {
    Name,
    Amount,
    Category,
    Date,
    Notes,
}

impl FormField {
    pub(crate) fn all() -> &'static [FormField] {
        &[
            Self::Name,
            Self::Amount,
            Self::Category,
            Self::Date,
            Self::Notes,
        ]
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Amount => "Amount",
            Self::Category => "Category",
            Self::Date => "Date",
            Self::Notes => "Notes",
        }
    }
}

/// What the text typed in `InputMode::Editing` is written back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditTarget {
    Form(FormField),
    BudgetLimit(ExpenseCategory),
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) search_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    /// `None` shows all time.
    pub(crate) current_month: Option<String>,

    // Dashboard
    pub(crate) history_scroll: usize,

    // Expenses
    pub(crate) category_filter: CategoryFilter,
    pub(crate) sort: SortState,
    pub(crate) expense_index: usize,
    pub(crate) expense_scroll: usize,

    // Add expense
    pub(crate) form: ExpenseDraft,
    pub(crate) form_field: usize,

    // Budgets
    pub(crate) budget_editor: BudgetEditor,
    pub(crate) budget_index: usize,
    pub(crate) budget_scroll: usize,

    // Inline editing
    pub(crate) edit_target: Option<EditTarget>,
    pub(crate) edit_input: String,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(ledger: &Ledger) -> Self {
        let status_message = match ledger.backups() {
            [] => String::new(),
            keys => format!("Unreadable data kept under {}", keys.join(", ")),
        };
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            search_input: String::new(),
            status_message,
            show_help: false,
            current_month: None,

            history_scroll: 0,

            category_filter: CategoryFilter::All,
            sort: SortState::default(),
            expense_index: 0,
            expense_scroll: 0,

            form: ExpenseDraft::default(),
            form_field: 0,

            budget_editor: BudgetEditor::new(ledger.budgets()),
            budget_index: 0,
            budget_scroll: 0,

            edit_target: None,
            edit_input: String::new(),

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    /// Expenses inside the selected month (all of them when no month is set).
    pub(crate) fn scoped_expenses(&self, ledger: &Ledger) -> Vec<Expense> {
        expenses_in_month(ledger.expenses(), self.current_month.as_deref())
    }

    /// The rows of the Expenses table, in display order.
    pub(crate) fn visible_expenses<'a>(&self, scoped: &'a [Expense]) -> Vec<&'a Expense> {
        filter_and_sort_expenses(
            scoped,
            &self.search_input,
            self.category_filter,
            self.sort.key,
            self.sort.direction,
        )
    }

    pub(crate) fn selected_expense(&self, ledger: &Ledger) -> Option<Expense> {
        let scoped = self.scoped_expenses(ledger);
        self.visible_expenses(&scoped)
            .get(self.expense_index)
            .map(|e| (*e).clone())
    }

    /// Step through All and then each category present in the current scope.
    pub(crate) fn cycle_category_filter(&mut self, ledger: &Ledger) {
        let scoped = self.scoped_expenses(ledger);
        let mut options = vec![CategoryFilter::All];
        options.extend(
            categories_present(&scoped)
                .into_iter()
                .map(CategoryFilter::Only),
        );
        let idx = options
            .iter()
            .position(|o| *o == self.category_filter)
            .unwrap_or(0);
        self.category_filter = options[(idx + 1) % options.len()];
        self.reset_expense_cursor();
    }

    pub(crate) fn reset_expense_cursor(&mut self) {
        self.expense_index = 0;
        self.expense_scroll = 0;
    }

    /// Keep the cursor on a row after the list shrank.
    pub(crate) fn clamp_expense_cursor(&mut self, len: usize) {
        if self.expense_index >= len {
            self.expense_index = len.saturating_sub(1);
        }
        if self.expense_scroll > self.expense_index {
            self.expense_scroll = self.expense_index;
        }
    }

    pub(crate) fn selected_form_field(&self) -> FormField {
        FormField::all()
            .get(self.form_field)
            .copied()
            .unwrap_or(FormField::Name)
    }

    pub(crate) fn form_value(&self, field: FormField) -> String {
        match field {
            FormField::Name => self.form.name.clone(),
            FormField::Amount => self.form.amount.clone(),
            FormField::Category => self.form.category.to_string(),
            FormField::Date => self.form.date.clone(),
            FormField::Notes => self.form.notes.clone(),
        }
    }

    pub(crate) fn begin_edit(&mut self, target: EditTarget) {
        self.edit_input = match target {
            EditTarget::Form(field) => self.form_value(field),
            EditTarget::BudgetLimit(category) => crate::models::BudgetRule::find(
                self.budget_editor.rules(),
                category,
            )
            .map(|r| r.monthly_limit.normalize().to_string())
            .unwrap_or_default(),
        };
        self.edit_target = Some(target);
        self.input_mode = InputMode::Editing;
    }

    pub(crate) fn selected_budget_category(&self) -> Option<ExpenseCategory> {
        self.budget_editor
            .rules()
            .get(self.budget_index)
            .map(|r| r.category)
    }

    pub(crate) fn clamp_budget_cursor(&mut self) {
        let len = self.budget_editor.len();
        if self.budget_index >= len {
            self.budget_index = len.saturating_sub(1);
        }
        if self.budget_scroll > self.budget_index {
            self.budget_scroll = self.budget_index;
        }
    }

    /// Replace the draft with the saved rules.
    pub(crate) fn reset_budget_draft(&mut self, ledger: &Ledger) {
        self.budget_editor = BudgetEditor::new(ledger.budgets());
        self.clamp_budget_cursor();
    }

    pub(crate) fn has_unsaved_budgets(&self, ledger: &Ledger) -> bool {
        self.budget_editor.is_dirty(ledger.budgets())
    }

    pub(crate) fn confirm(&mut self, message: impl Into<String>, action: PendingAction) {
        self.confirm_message = message.into();
        self.pending_action = Some(action);
        self.input_mode = InputMode::Confirm;
    }

    pub(crate) fn scope_label(&self) -> String {
        self.current_month
            .as_deref()
            .map(crate::aggregate::month_label)
            .unwrap_or_else(|| "All time".into())
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
