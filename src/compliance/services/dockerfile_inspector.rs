use crate::compliance::domain::{DockerfileInfo, Technology};

/// DockerfileInspector infers the base image of a container build file
///
/// Only the first `FROM` directive is considered; later stages of a
/// multi-stage build are ignored.
pub struct DockerfileInspector;

impl DockerfileInspector {
    /// Extracts base image information from Dockerfile content
    ///
    /// # Arguments
    /// * `content` - Full text of the Dockerfile
    ///
    /// # Returns
    /// DockerfileInfo with one inferred language technology, or None when
    /// the file has no `FROM` directive
    pub fn inspect(content: &str) -> Option<DockerfileInfo> {
        let reference = content.lines().find_map(Self::from_reference)?;
        let (image, version) = Self::split_reference(reference);

        let name = image.rsplit('/').next().unwrap_or(image).to_string();

        Some(DockerfileInfo {
            base_image: image.to_string(),
            base_version: version.to_string(),
            technologies: vec![Technology::language(name, version)],
        })
    }

    /// The image reference of a `FROM` line, skipping `--platform=` style flags.
    fn from_reference(line: &str) -> Option<&str> {
        let mut tokens = line.split_whitespace();
        let keyword = tokens.next()?;
        if !keyword.eq_ignore_ascii_case("FROM") {
            return None;
        }
        tokens.find(|token| !token.starts_with("--"))
    }

    /// Splits `registry:5000/team/image:tag` into image and tag.
    ///
    /// The tag separator is the last `:` after the last `/`, so registry
    /// ports stay part of the image. Digests (`@sha256:...`) are dropped.
    fn split_reference(reference: &str) -> (&str, &str) {
        let reference = reference.split('@').next().unwrap_or(reference);
        let name_start = reference.rfind('/').map(|i| i + 1).unwrap_or(0);
        match reference[name_start..].rfind(':') {
            Some(offset) => {
                let colon = name_start + offset;
                (&reference[..colon], &reference[colon + 1..])
            }
            None => (reference, ""),
        }
    }
}
