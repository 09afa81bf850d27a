use shuffle_core::*;

use crate::capability::Representation;

/// Backing store of a drag-and-drop collection view.
///
/// Mutations are applied by the view *before* it asks for the matching
/// visual update, so the store is always the source of truth.
pub trait CollectionDataSource {
    type Item: Clone + PartialEq;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn item_at(&self, index: usize) -> Option<Self::Item>;

    /// Position of an equal item. Linear scan by default.
    fn index_of(&self, item: &Self::Item) -> Option<usize> {
        (0..self.len()).find(|&i| self.item_at(i).as_ref() == Some(item))
    }

    fn insert_item(&mut self, item: Self::Item, index: usize) -> Result<(), StoreError>;

    fn delete_item(&mut self, index: usize) -> Result<Self::Item, StoreError>;

    fn move_item(&mut self, from: usize, to: usize) -> Result<(), StoreError>;

    fn is_draggable(&self, _index: usize) -> bool {
        true
    }

    fn is_droppable(&self, _index: usize) -> bool {
        true
    }

    fn style_representation(&self, _representation: &mut Representation) {}

    /// Paints the cell at `index` into `bounds` (cell-local, origin at zero).
    fn paint_cell(&self, _index: usize, bounds: Rect) -> Vec<SceneNode> {
        vec![SceneNode::Rect {
            rect: bounds,
            color: Color::from_hex("#356695"),
            radius: 4.0,
        }]
    }
}

type IndexPolicy = Box<dyn Fn(usize) -> bool>;

/// `Vec`-backed data source with optional per-index policies.
pub struct VecDataSource<T> {
    items: Vec<T>,
    color: Color,
    draggable: Option<IndexPolicy>,
    droppable: Option<IndexPolicy>,
    label: Option<Box<dyn Fn(&T) -> String>>,
    styling: Option<Box<dyn Fn(&mut Representation)>>,
}

impl<T> VecDataSource<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            color: Color::from_hex("#356695"),
            draggable: None,
            droppable: None,
            label: None,
            styling: None,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn draggable_when(mut self, f: impl Fn(usize) -> bool + 'static) -> Self {
        self.draggable = Some(Box::new(f));
        self
    }

    pub fn droppable_when(mut self, f: impl Fn(usize) -> bool + 'static) -> Self {
        self.droppable = Some(Box::new(f));
        self
    }

    pub fn label(mut self, f: impl Fn(&T) -> String + 'static) -> Self {
        self.label = Some(Box::new(f));
        self
    }

    pub fn styling(mut self, f: impl Fn(&mut Representation) + 'static) -> Self {
        self.styling = Some(Box::new(f));
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    fn check(&self, index: usize, len: usize) -> Result<(), StoreError> {
        if index < len {
            Ok(())
        } else {
            Err(StoreError::IndexOutOfBounds { index, len })
        }
    }
}

impl<T: Clone + PartialEq> CollectionDataSource for VecDataSource<T> {
    type Item = T;

    fn len(&self) -> usize {
        self.items.len()
    }

    fn item_at(&self, index: usize) -> Option<T> {
        self.items.get(index).cloned()
    }

    fn index_of(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|i| i == item)
    }

    fn insert_item(&mut self, item: T, index: usize) -> Result<(), StoreError> {
        // inserting at len appends
        self.check(index, self.items.len() + 1)?;
        self.items.insert(index, item);
        Ok(())
    }

    fn delete_item(&mut self, index: usize) -> Result<T, StoreError> {
        self.check(index, self.items.len())?;
        Ok(self.items.remove(index))
    }

    fn move_item(&mut self, from: usize, to: usize) -> Result<(), StoreError> {
        let len = self.items.len();
        self.check(from, len)?;
        self.check(to, len)?;
        let item = self.items.remove(from);
        self.items.insert(to, item);
        Ok(())
    }

    fn is_draggable(&self, index: usize) -> bool {
        self.draggable.as_ref().is_none_or(|f| f(index))
    }

    fn is_droppable(&self, index: usize) -> bool {
        self.droppable.as_ref().is_none_or(|f| f(index))
    }

    fn style_representation(&self, representation: &mut Representation) {
        if let Some(f) = &self.styling {
            f(representation);
        }
    }

    fn paint_cell(&self, index: usize, bounds: Rect) -> Vec<SceneNode> {
        let mut nodes = vec![SceneNode::Rect {
            rect: bounds,
            color: self.color,
            radius: 4.0,
        }];
        if let (Some(label), Some(item)) = (&self.label, self.items.get(index)) {
            nodes.push(SceneNode::Text {
                rect: bounds,
                text: label(item),
                color: Color::WHITE,
                size: 14.0,
            });
        }
        nodes
    }
}
