//! Project scaffolding templates.
//!
//! Each template is a list of (relative path, content) pairs materialized
//! under the new project directory.

use crate::project::ProjectKind;

pub(crate) fn files_for(kind: ProjectKind, name: &str) -> Vec<(String, String)> {
    match kind {
        ProjectKind::Python => python_template(name),
        ProjectKind::Web => web_template(name),
        ProjectKind::Ml => ml_template(name),
        ProjectKind::Basic => basic_template(name),
    }
}

fn python_template(name: &str) -> Vec<(String, String)> {
    vec![
        (
            "README.md".into(),
            format!(
                "# {name}\n\nA Python project created by Wrench.\n\n\
                 ## Setup\n```bash\npython -m venv venv\nsource venv/bin/activate\n\
                 pip install -r requirements.txt\n```\n\n\
                 ## Usage\n```bash\npython src/main.py\n```\n\n\
                 ## Development\n```bash\npytest tests/\n```\n"
            ),
        ),
        (
            "requirements.txt".into(),
            "# Core dependencies\nrequests>=2.25.1\npython-dotenv>=0.19.0\n\n\
             # Development dependencies\npytest>=6.2.4\nblack>=21.5b0\n"
                .into(),
        ),
        ("src/__init__.py".into(), String::new()),
        (
            "src/main.py".into(),
            format!(
                "#!/usr/bin/env python3\n\"\"\"{name} - Main application module\"\"\"\n\n\n\
                 def main():\n    \"\"\"Main application entry point\"\"\"\n    \
                 print(\"Welcome to {name}!\")\n\n\n\
                 if __name__ == \"__main__\":\n    main()\n"
            ),
        ),
        ("tests/__init__.py".into(), String::new()),
        (
            "tests/test_main.py".into(),
            "\"\"\"Tests for main module\"\"\"\nfrom src.main import main\n\n\n\
             def test_main():\n    main()\n"
                .into(),
        ),
        (
            ".gitignore".into(),
            "__pycache__/\n*.py[cod]\n.env\n.venv\nvenv/\ndist/\n*.egg-info/\n".into(),
        ),
    ]
}

fn web_template(name: &str) -> Vec<(String, String)> {
    let mut files = python_template(name);
    replace(
        &mut files,
        "requirements.txt",
        "# Web framework\nfastapi>=0.68.0\nuvicorn[standard]>=0.15.0\n\n\
         # HTTP requests\nrequests>=2.26.0\nhttpx>=0.24.0\n\n\
         # Development\npytest>=6.2.4\npytest-asyncio>=0.15.0\n"
            .into(),
    );
    replace(
        &mut files,
        "src/main.py",
        format!(
            "\"\"\"{name} - FastAPI Web Application\"\"\"\nfrom fastapi import FastAPI\n\n\
             app = FastAPI(title=\"{name}\", version=\"0.1.0\")\n\n\n\
             @app.get(\"/\")\nasync def root():\n    \
             return {{\"message\": \"Welcome to {name}!\"}}\n\n\n\
             @app.get(\"/health\")\nasync def health_check():\n    \
             return {{\"status\": \"healthy\"}}\n"
        ),
    );
    files
}

fn ml_template(name: &str) -> Vec<(String, String)> {
    let mut files = python_template(name);
    replace(
        &mut files,
        "requirements.txt",
        "# Machine Learning\nnumpy>=1.21.0\npandas>=1.3.0\nscikit-learn>=1.0.0\n\
         matplotlib>=3.4.0\njupyter>=1.0.0\n\n# Development\npytest>=6.2.4\n"
            .into(),
    );
    files.push((
        "src/data_loader.py".into(),
        "\"\"\"Data loading utilities\"\"\"\nfrom pathlib import Path\n\nimport pandas as pd\n\n\n\
         class DataLoader:\n    def __init__(self, data_dir: str = \"data\"):\n        \
         self.data_dir = Path(data_dir)\n        self.data_dir.mkdir(exist_ok=True)\n\n    \
         def load_csv(self, filename: str) -> pd.DataFrame:\n        \
         return pd.read_csv(self.data_dir / filename)\n"
            .into(),
    ));
    files.push(("notebooks/.gitkeep".into(), String::new()));
    files.push(("data/.gitkeep".into(), String::new()));
    files.push(("models/.gitkeep".into(), String::new()));
    files
}

fn basic_template(name: &str) -> Vec<(String, String)> {
    vec![
        (
            "README.md".into(),
            format!("# {name}\n\nA project created by Wrench.\n"),
        ),
        (
            "main.py".into(),
            format!("print(\"Hello from {name}!\")\n"),
        ),
        (".gitignore".into(), "*.pyc\n__pycache__/\n.env\n".into()),
    ]
}

fn replace(files: &mut [(String, String)], path: &str, content: String) {
    if let Some(entry) = files.iter_mut().find(|(p, _)| p == path) {
        entry.1 = content;
    }
}
