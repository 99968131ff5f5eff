//! Prompt assembly for README generation.

/// A user-uploaded file forwarded into the prompt (a logo, an existing
/// README, a design doc).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedFile {
    pub name: String,
    /// MIME type as reported by the uploader.
    pub kind: String,
    pub content: String,
}

/// Everything the model sees for one generation. Rendered as tagged
/// sections followed by a fixed instruction block; the instruction block
/// is what makes the model wrap its answer in the ```` ```md ```` fence
/// that [`crate::FenceStripper`] later removes.
#[derive(Debug, Clone, Default)]
pub struct GenerationPrompt {
    pub repo_content: String,
    pub repo_url: String,
    pub template_content: String,
    pub additional_context: String,
    pub files: Vec<AttachedFile>,
}

const INSTRUCTIONS: &str = r#"You are an expert technical writer tasked with creating a comprehensive README.md file for a GitHub repository.

CRITICAL REQUIREMENTS:
- Follow the template structure exactly
- If the project's README contains meaningful information like screenshots, diagrams, etc., include them somewhere in the generated README
- Use this as a placeholder for logos unless the logo was provided by the user or is from the existing README: https://github.com/user-attachments/assets/0ae1b6d5-1a62-4b41-b2c7-c595a0460497
- Use this as a placeholder for videos unless the video was provided by the user or is from the existing README: https://github.com/user-attachments/assets/f45c9ee9-ad2f-40f4-bb60-e9bbd1472c45
- Use this as a placeholder for images unless the image was provided by the user or is from the existing README: https://github.com/user-attachments/assets/721b7fb3-e480-4809-9023-fd48b82b1f8c
- Keep any HTML tags, markdown comments, and attributes from the template
- Carefully analyze the repository contents to accurately describe the project
- WRAP YOUR RESPONSE IN MD TAGS BY STARTING THE RESPONSE WITH "```md" AND ENDING WITH "```"

Analyze the repository contents. Then create a README.md file, taking into account any additional instructions provided.

Please respond with the README.md file immediately:"#;

impl GenerationPrompt {
    pub fn new(repo_content: impl Into<String>, repo_url: impl Into<String>) -> Self {
        Self {
            repo_content: repo_content.into(),
            repo_url: repo_url.into(),
            ..Self::default()
        }
    }

    pub fn with_template(mut self, template_content: impl Into<String>) -> Self {
        self.template_content = template_content.into();
        self
    }

    pub fn with_additional_context(mut self, additional_context: impl Into<String>) -> Self {
        self.additional_context = additional_context.into();
        self
    }

    pub fn with_files(mut self, files: Vec<AttachedFile>) -> Self {
        self.files = files;
        self
    }

    pub fn render(&self) -> String {
        let mut prompt = format!(
            "<repository contents>\n{}\n</repository contents>\n\n\
             <template content>\n{}\n</template content>\n\n\
             <repository url>\n{}\n</repository url>\n\n\
             <additional instructions provided by the user>\n{}\n</additional instructions provided by the user>\n\n",
            self.repo_content, self.template_content, self.repo_url, self.additional_context
        );

        if !self.files.is_empty() {
            prompt.push_str("<attached files>\n");
            for file in &self.files {
                prompt.push_str(&format!(
                    "--- {} ({}) ---\n{}\n",
                    file.name, file.kind, file.content
                ));
            }
            prompt.push_str("</attached files>\n\n");
        }

        prompt.push_str(INSTRUCTIONS);
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_sections_in_order() {
        let prompt = GenerationPrompt::new("digest", "https://github.com/acme/widget")
            .with_template("# {title}")
            .with_additional_context("Mention the CLI.")
            .render();

        let repo = prompt.find("<repository contents>").unwrap();
        let template = prompt.find("<template content>").unwrap();
        let url = prompt.find("<repository url>").unwrap();
        let context = prompt
            .find("<additional instructions provided by the user>")
            .unwrap();
        let instructions = prompt.find("CRITICAL REQUIREMENTS:").unwrap();

        assert!(repo < template && template < url && url < context && context < instructions);
        assert!(prompt.contains("https://github.com/acme/widget"));
        assert!(prompt.contains("Mention the CLI."));
        assert!(prompt.ends_with("Please respond with the README.md file immediately:"));
    }

    #[test]
    fn attached_files_render_between_context_and_instructions() {
        let prompt = GenerationPrompt::new("digest", "https://github.com/acme/widget")
            .with_files(vec![AttachedFile {
                name: "logo.svg".into(),
                kind: "image/svg+xml".into(),
                content: "<svg/>".into(),
            }])
            .render();

        assert!(prompt.contains("<attached files>\n--- logo.svg (image/svg+xml) ---\n<svg/>"));
    }

    #[test]
    fn file_section_omitted_when_empty() {
        let prompt = GenerationPrompt::new("digest", "https://github.com/acme/widget").render();
        assert!(!prompt.contains("<attached files>"));
        assert!(prompt.contains("WRAP YOUR RESPONSE IN MD TAGS"));
    }
}
