//! Kind-specific parsers.
//!
//! Each parser decodes its content record, registers the objects the record
//! refers to (with the kind the reference implies), and attaches the result
//! to the object. Objects that are already parsed are not decoded again.

use oix_store::{CommitRecord, EntryMode, TagRecord, TreeRecord};
use oix_types::{ObjectId, ObjectKind};

use crate::error::{ParseFailure, ParseResult};
use crate::object::{CommitData, ObjectHandle, Payload, TagData, TreeData, TreeItem};
use crate::registry::{BufferDisposition, ObjectRegistry};

fn corrupt(id: ObjectId, kind: ObjectKind, reason: impl ToString) -> ParseFailure {
    ParseFailure::Corrupt {
        id,
        kind,
        reason: reason.to_string(),
    }
}

impl ObjectRegistry {
    /// Commits keep the buffer whenever none is attached yet.
    pub(crate) fn parse_commit(
        &mut self,
        handle: ObjectHandle,
        buffer: Vec<u8>,
    ) -> ParseResult<BufferDisposition> {
        if !self.get(handle).is_parsed() {
            let id = *self.get(handle).id();
            let record = CommitRecord::decode(&buffer)
                .map_err(|e| corrupt(id, ObjectKind::Commit, e))?;
            let tree = self.lookup_typed(record.tree, ObjectKind::Tree)?;
            let parents = record
                .parents
                .iter()
                .map(|parent| self.lookup_typed(*parent, ObjectKind::Commit))
                .collect::<ParseResult<Vec<_>>>()?;
            self.get_mut(handle).materialize(Payload::Commit(CommitData {
                tree,
                parents,
                author: record.author,
                message: record.message,
                buffer: None,
            }));
        }

        match self.get_mut(handle).payload_mut() {
            Payload::Commit(commit) if commit.buffer.is_none() => {
                commit.buffer = Some(buffer);
                Ok(BufferDisposition::Consumed)
            }
            _ => Ok(BufferDisposition::NotConsumed(buffer)),
        }
    }

    /// Trees keep the buffer only when this call is the one that parses them.
    pub(crate) fn parse_tree(
        &mut self,
        handle: ObjectHandle,
        buffer: Vec<u8>,
    ) -> ParseResult<BufferDisposition> {
        if self.get(handle).is_parsed() {
            return Ok(BufferDisposition::NotConsumed(buffer));
        }
        let id = *self.get(handle).id();
        let record = TreeRecord::decode(&buffer).map_err(|e| corrupt(id, ObjectKind::Tree, e))?;

        let mut entries = Vec::with_capacity(record.entries.len());
        for entry in record.entries {
            if entry.mode == EntryMode::Invalid {
                return Err(corrupt(
                    id,
                    ObjectKind::Tree,
                    format!("entry {:?} has no mode", entry.name),
                ));
            }
            let object = self.lookup_typed(entry.object_id, entry.mode.object_kind())?;
            entries.push(TreeItem {
                mode: entry.mode,
                name: entry.name,
                object,
            });
        }

        self.get_mut(handle).materialize(Payload::Tree(TreeData {
            entries,
            buffer: Some(buffer),
        }));
        Ok(BufferDisposition::Consumed)
    }

    pub(crate) fn parse_blob(&mut self, handle: ObjectHandle, buffer: Vec<u8>) -> BufferDisposition {
        let obj = self.get_mut(handle);
        if !obj.is_parsed() {
            obj.materialize(Payload::Blob);
        }
        BufferDisposition::NotConsumed(buffer)
    }

    pub(crate) fn parse_tag(
        &mut self,
        handle: ObjectHandle,
        buffer: Vec<u8>,
    ) -> ParseResult<BufferDisposition> {
        if !self.get(handle).is_parsed() {
            let id = *self.get(handle).id();
            let record = TagRecord::decode(&buffer).map_err(|e| corrupt(id, ObjectKind::Tag, e))?;
            if !record.target_kind.is_concrete() {
                return Err(corrupt(id, ObjectKind::Tag, "tag target has no kind"));
            }
            let target = self.lookup_typed(record.target, record.target_kind)?;
            self.get_mut(handle).materialize(Payload::Tag(TagData {
                target,
                target_kind: record.target_kind,
                name: record.name,
                message: record.message,
            }));
        }
        Ok(BufferDisposition::NotConsumed(buffer))
    }
}
