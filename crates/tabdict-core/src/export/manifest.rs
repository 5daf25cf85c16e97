use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::markup::write_framed;
use super::{ExportConfig, ExportError};

const OPF_FOOTER: &str = r#"
<tours/>
<guide> <reference type="search" title="Dictionary Search" onclick= "index_search()"/> </guide>
</package>
"#;

fn opf_header(name: &str, source: &str, target: &str) -> String {
    format!(
        r#"<?xml version="1.0"?><!DOCTYPE package SYSTEM "oeb1.ent">

<!-- the command line instruction 'prcgen dictionary.opf' will produce the dictionary.prc file in the same folder-->
<!-- the command line instruction 'mobigen dictionary.opf' will produce the dictionary.mobi file in the same folder-->

<package unique-identifier="uid" xmlns:dc="Dublin Core">

<metadata>
	<dc-metadata>
		<dc:Identifier id="uid">{name}</dc:Identifier>
		<!-- Title of the document -->
		<dc:Title><h2>{name}</h2></dc:Title>
		<dc:Language>{source}</dc:Language>
	</dc-metadata>
	<x-metadata>
	        <output encoding="utf-8" flatten-dynamic-dir="yes"/>
		<DictionaryInLanguage>{source}</DictionaryInLanguage>
		<DictionaryOutLanguage>{target}</DictionaryOutLanguage>
	</x-metadata>
</metadata>

<!-- list of all the files needed to produce the .prc file -->
<manifest>
"#
    )
}

pub fn manifest_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.opf"))
}

/// Write `{name}.opf` referencing key files `0..files` in order: one
/// `<item>` each in the manifest, then one `<itemref>` each in the spine.
pub fn write_opf(files: usize, name: &str, config: &ExportConfig) -> Result<PathBuf, ExportError> {
    let path = manifest_path(&config.output_dir, name);
    debug!(path = %path.display(), files, "writing manifest");

    let header = opf_header(name, &config.source_language, &config.target_language);
    let mut out = BufWriter::new(File::create(&path)?);
    write_framed(&mut out, &header, OPF_FOOTER, |out| {
        for i in 0..files {
            writeln!(
                out,
                r#"     <item id="dictionary{i}" href="{name}{i}.html" media-type="text/x-oeb1-document"/>"#
            )?;
        }
        write!(
            out,
            "\n</manifest>\n<!-- list of the html files in the correct order  -->\n<spine>\n"
        )?;
        for i in 0..files {
            write!(out, "\n\t<itemref idref=\"dictionary{i}\"/>\n")?;
        }
        write!(out, "\n</spine>\n")?;
        Ok(())
    })?;

    Ok(path)
}
