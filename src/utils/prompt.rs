use crate::models::UserStory;

const RESPONSE_EXAMPLE: &str = r#"{
    "Title": "Verify Login Functionality",
    "Objective": "Verify that a user can log in with valid credentials",
    "Precondition": "User must be registered and have valid credentials",
    "Test steps": [
        {
            "Step": "1. Enter valid username and password",
            "Test Data": "Username: testuser, Password: testpass",
            "Expected Result": "User is logged in successfully"
        },
        {
            "Step": "2. Enter invalid username and password",
            "Test Data": "Username: invaliduser, Password: invalidpass",
            "Expected Result": "Error message is displayed"
        }
    ],
    "Coverage": "Requirement ID: LOGIN-001",
    "Status": "Draft"
}"#;

/// Construye el prompt que se envía al modelo para una historia de usuario
pub fn build_prompt(story: &UserStory, system_info: &str) -> String {
    format!(
        "Generate detailed test cases for the following user story:\n\
         {story}\n\
         Please return the output in **strict JSON format**, with no extra text, using the structure below.\n\
         Return either a single test case object or a JSON array of test case objects:\n\n\
         {example}\n\
         Ensure that the response is **valid JSON**, without any markdown formatting, explanations, or additional text.\n\
         Use the following additional information as an aid to write the steps in the test cases and not the full test cases.\n\
         Additional System Context:\n\
         {system_info}",
        story = story.text,
        example = RESPONSE_EXAMPLE,
        system_info = system_info,
    )
}
