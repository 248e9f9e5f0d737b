//! Prompt templates, one set per generation path.

use crate::config::UiFramework;
use crate::routing::TestCategory;

pub const GHERKIN_INSTRUCTIONS: &str = "\
You are a BDD test expert. Generate and improve Gherkin feature files.
Follow these rules:
1. Use Feature, Background (if needed), Scenario format
2. Each scenario must have Given, When, Then steps
3. Include edge cases and error scenarios
4. Make steps clear and specific for automation";

pub const SELENIUM_INSTRUCTIONS: &str = "\
You are a QA automation expert. Generate Selenium test scripts.
Follow these rules:
1. Use Python with Selenium WebDriver
2. Include proper waits and error handling
3. Follow Page Object Model when appropriate
4. Add clear comments and docstrings
5. Handle edge cases and errors";

pub const API_INSTRUCTIONS: &str = "\
You are a QA automation expert specialized in API testing that can:
1. Generate API test scripts using requests and pytest
2. Handle different HTTP methods and status codes
3. Validate JSON responses and headers
4. Follow RESTful API testing best practices
5. Generate maintainable and reliable test code";

pub const DATABASE_INSTRUCTIONS: &str = "\
You are a QA automation expert specialized in database testing that can:
1. Generate database test scripts using pytest and SQL
2. Handle different database operations (CRUD)
3. Test data integrity and constraints
4. Validate stored procedures and triggers
5. Test database transactions and rollbacks
6. Handle multiple database types (MySQL, PostgreSQL, SQLite)
7. Test database migrations and schema changes
8. Validate data relationships and foreign keys
9. Test database performance and optimization
10. Generate test data and database fixtures";

/// First draft of a feature file.
pub fn gherkin_draft(requirement: &str) -> String {
    format!("Generate Gherkin feature file for: {}", requirement)
}

/// Self-critique round: the model reviews its own draft and returns a full replacement.
pub fn evaluate_and_improve(content: &str) -> String {
    format!(
        "Evaluate this Gherkin feature file and suggest improvements:

{content}

Focus on:
1. Missing scenarios or edge cases
2. Unclear steps that need more detail
3. Additional validation steps needed
4. Error scenarios that should be covered

Provide the complete improved feature file with all suggested changes incorporated."
    )
}

pub fn selenium_script(requirement: &str) -> String {
    format!(
        "Generate a Selenium test script in Python for the following requirement:
{requirement}

Include:
1. Proper setup and teardown
2. WebDriverWait for elements
3. Try-except blocks for error handling
4. Clear comments and docstrings
5. Page Object Model if appropriate"
    )
}

/// System instructions for UI test generation in `framework`.
pub fn ui_instructions(framework: UiFramework) -> String {
    format!(
        "You are a QA automation expert specialized in {} UI testing that can:
1. Read and understand Gherkin feature files
2. Generate UI test scripts based on scenarios
3. Handle different types of assertions and validations
4. Follow best practices for web test automation
5. Generate maintainable and reliable test code",
        framework.title()
    )
}

/// Instructions plus user prompt for a feature-driven test script.
///
/// `feature_json` is the pretty JSON form of the parsed feature. Returns
/// `None` for [`TestCategory::Gherkin`], which has no script template.
pub fn feature_test(category: TestCategory, feature_json: &str) -> Option<(String, String)> {
    let (instructions, requirements, kind) = match category {
        TestCategory::Database => (
            DATABASE_INSTRUCTIONS.to_string(),
            DATABASE_REQUIREMENTS,
            "pytest database",
        ),
        TestCategory::Api => (API_INSTRUCTIONS.to_string(), API_REQUIREMENTS, "pytest API"),
        TestCategory::UiPlaywright => (
            ui_instructions(UiFramework::Playwright),
            PLAYWRIGHT_REQUIREMENTS,
            "pytest-playwright",
        ),
        TestCategory::UiSelenium => (
            ui_instructions(UiFramework::Selenium),
            SELENIUM_REQUIREMENTS,
            "pytest-selenium",
        ),
        TestCategory::Gherkin => return None,
    };
    let prompt = format!(
        "Generate a {kind} test file for this Gherkin feature:\n{feature_json}\n\nRequirements:\n{requirements}"
    );
    Some((instructions, prompt))
}

const DATABASE_REQUIREMENTS: &str = "\
1. Use pytest fixtures for database connections
2. Include proper database setup and teardown
3. Handle transactions and rollbacks
4. Include data validation and integrity checks
5. Use parameterized tests for data-driven scenarios
6. Follow database testing best practices
7. Include proper error handling and assertions
8. Generate test data as needed
9. Handle database-specific operations
10. Include proper documentation and comments";

const API_REQUIREMENTS: &str = "\
1. Use pytest fixtures for API setup
2. Include proper request handling
3. Validate response status codes
4. Check response headers and body
5. Handle authentication and tokens
6. Follow API testing best practices
7. Include proper error handling
8. Generate test data as needed
9. Handle different HTTP methods
10. Include proper documentation";

const PLAYWRIGHT_REQUIREMENTS: &str = "\
1. Use pytest-playwright
2. Include proper imports and fixtures
3. Use page.locator() for element selection
4. Include proper assertions using expect()
5. Handle async/await properly
6. Add proper error handling and timeouts
7. Follow Playwright best practices";

const SELENIUM_REQUIREMENTS: &str = "\
1. Use pytest with Selenium WebDriver
2. Include proper imports and fixtures
3. Use explicit waits with WebDriverWait
4. Include proper By selectors and assertions
5. Handle driver setup and cleanup
6. Add proper error handling
7. Follow Selenium best practices";
