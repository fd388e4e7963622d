//! 以 `quick-xml` 為基礎的 XML 讀寫
//!
//! 送出的文件先建成元素樹再交給 event writer 序列化，文字與屬性值一律由
//! writer 跳脫，不會直接拼進標記中。收到的文件則依文件順序攤平成元素清單，
//! 每個元素保留本身的文字與祖先元素的 local name。

use crate::utils::error::{ProoferError, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum XmlContent {
    Text(String),
    Children(Vec<XmlElement>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct XmlElement {
    name: &'static str,
    attributes: Vec<(&'static str, String)>,
    content: XmlContent,
}

impl XmlElement {
    pub(crate) fn text(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            content: XmlContent::Text(value.into()),
        }
    }

    pub(crate) fn parent(name: &'static str, children: Vec<XmlElement>) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            content: XmlContent::Children(children),
        }
    }

    pub(crate) fn attr(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((key, value.into()));
        self
    }

    /// 序列化為含 XML 宣告的 UTF-8 文件
    pub(crate) fn to_document(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        emit(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        )?;
        self.write_to(&mut writer)?;

        String::from_utf8(writer.into_inner()).map_err(|e| ProoferError::RequestBuild {
            message: format!("serialized document is not UTF-8: {}", e),
        })
    }

    fn write_to(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        let start = BytesStart::new(self.name).with_attributes(
            self.attributes
                .iter()
                .map(|(key, value)| (*key, value.as_str())),
        );
        emit(writer, Event::Start(start))?;

        match &self.content {
            // 空值仍保留開關標籤，節點必須存在
            XmlContent::Text(text) if text.is_empty() => {}
            XmlContent::Text(text) => emit(writer, Event::Text(BytesText::new(text)))?,
            XmlContent::Children(children) => {
                for child in children {
                    child.write_to(writer)?;
                }
            }
        }

        emit(writer, Event::End(BytesEnd::new(self.name)))
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| ProoferError::RequestBuild {
            message: e.to_string(),
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct XmlNode {
    /// 去除命名空間前綴後的名稱
    pub name: String,
    pub ancestors: Vec<String>,
    /// 元素本身的文字內容 (已去除前後空白)
    pub text: String,
}

impl XmlNode {
    pub(crate) fn is_within(&self, ancestor: &str) -> bool {
        self.ancestors.iter().any(|name| name == ancestor)
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct XmlDocument {
    nodes: Vec<XmlNode>,
}

impl XmlDocument {
    pub(crate) fn parse(body: &str) -> Result<Self> {
        let mut reader = Reader::from_str(body);
        let mut nodes: Vec<XmlNode> = Vec::new();
        let mut open: Vec<usize> = Vec::new();

        loop {
            let event = reader.read_event().map_err(|e| malformed(&reader, e))?;

            match event {
                Event::Start(start) => {
                    nodes.push(XmlNode {
                        name: local_name(&start),
                        ancestors: ancestors(&nodes, &open),
                        text: String::new(),
                    });
                    open.push(nodes.len() - 1);
                }
                Event::Empty(start) => {
                    nodes.push(XmlNode {
                        name: local_name(&start),
                        ancestors: ancestors(&nodes, &open),
                        text: String::new(),
                    });
                }
                Event::Text(text) => {
                    if let Some(&index) = open.last() {
                        let value = text.unescape().map_err(|e| malformed(&reader, e))?;
                        nodes[index].text.push_str(&value);
                    }
                }
                Event::CData(data) => {
                    if let Some(&index) = open.last() {
                        nodes[index].text.push_str(&String::from_utf8_lossy(&data));
                    }
                }
                Event::End(_) => {
                    if let Some(index) = open.pop() {
                        let trimmed = nodes[index].text.trim().to_string();
                        nodes[index].text = trimmed;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        // 文件結束時仍有未關閉的元素
        if !open.is_empty() {
            return Err(ProoferError::MalformedResponse {
                message: "document ended with unclosed elements".to_string(),
            });
        }

        Ok(Self { nodes })
    }

    pub(crate) fn nodes(&self) -> &[XmlNode] {
        &self.nodes
    }

    pub(crate) fn find(&self, name: &str) -> Option<&XmlNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    pub(crate) fn first_text(&self, name: &str) -> Option<&str> {
        self.find(name).map(|node| node.text.as_str())
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub(crate) fn count(&self, name: &str) -> usize {
        self.nodes.iter().filter(|node| node.name == name).count()
    }
}

fn local_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

fn ancestors(nodes: &[XmlNode], open: &[usize]) -> Vec<String> {
    open.iter().map(|&index| nodes[index].name.clone()).collect()
}

fn malformed(reader: &Reader<&[u8]>, err: impl std::fmt::Display) -> ProoferError {
    ProoferError::MalformedResponse {
        message: format!("at byte {}: {}", reader.buffer_position(), err),
    }
}
